//! External collaborators of the Escriba client.
//!
//! Everything here talks to (or stands in for) the hosted backend
//! platform: the answering function, the identity provider, the
//! demo-provisioning endpoint, and the document-analysis contract.

pub mod answer_api_agent;
pub mod auth_client;
pub mod demo;
pub mod session;
pub mod session_storage;
pub mod simulated_analyzer;

pub use answer_api_agent::HostedAnswerAgent;
pub use auth_client::AuthClient;
pub use demo::{DemoAccessClient, DemoCredentials};
pub use session::{Session, SessionGuard, SessionStore, UserInfo};
pub use session_storage::SessionStorage;
pub use simulated_analyzer::SimulatedAnalyzer;
