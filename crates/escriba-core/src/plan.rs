//! Subscription plans and display-only usage counters.
//!
//! Quotas are informational: nothing in the client enforces them.

use serde::{Deserialize, Serialize};

/// Subscription plan of the signed-in office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl Plan {
    /// Monthly chat-question allowance.
    pub fn chat_limit(&self) -> u32 {
        match self {
            Plan::Free => 10,
            Plan::Pro => 100,
        }
    }

    /// Monthly document-analysis allowance.
    pub fn analysis_limit(&self) -> u32 {
        match self {
            Plan::Free => 5,
            Plan::Pro => 100,
        }
    }
}

/// Display-only usage counters shown in page headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageCounters {
    pub chats_used: u32,
    pub analyses_used: u32,
}

impl UsageCounters {
    /// Header string like `3/10 chats`.
    pub fn chat_display(&self, plan: Plan) -> String {
        format!("{}/{} chats", self.chats_used, plan.chat_limit())
    }

    /// Header string like `2/5 análises`.
    pub fn analysis_display(&self, plan: Plan) -> String {
        format!("{}/{} análises", self.analyses_used, plan.analysis_limit())
    }

    /// Records one more chat question, for display purposes only.
    pub fn record_chat(&mut self) {
        self.chats_used = self.chats_used.saturating_add(1);
    }

    /// Records one more analysis, for display purposes only.
    pub fn record_analysis(&mut self) {
        self.analyses_used = self.analyses_used.saturating_add(1);
    }
}
