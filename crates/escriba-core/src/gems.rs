//! Built-in assistant template catalog (GEMS).

use serde::{Deserialize, Serialize};

/// A pre-built assistant template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Available only on the Pro plan.
    pub pro: bool,
}

/// Returns the official pre-built assistant templates.
pub fn builtin_gems() -> Vec<GemTemplate> {
    vec![
        GemTemplate {
            id: "qualificador-registral".to_string(),
            name: "Qualificador Registral".to_string(),
            description: "Analisa títulos e aponta vícios formais e materiais de acordo com a Lei de Registros Públicos".to_string(),
            category: "Análise".to_string(),
            pro: false,
        },
        GemTemplate {
            id: "mentor-junior".to_string(),
            name: "Mentor Junior".to_string(),
            description: "Assistente educacional que explica conceitos cartoriais para colaboradores em treinamento".to_string(),
            category: "Educação".to_string(),
            pro: false,
        },
        GemTemplate {
            id: "gerador-de-minutas".to_string(),
            name: "Gerador de Minutas".to_string(),
            description: "Cria minutas padronizadas para diversos tipos de atos cartoriais".to_string(),
            category: "Produtividade".to_string(),
            pro: true,
        },
        GemTemplate {
            id: "pesquisador-de-jurisprudencia".to_string(),
            name: "Pesquisador de Jurisprudência".to_string(),
            description: "Busca e resume decisões judiciais relacionadas a casos específicos".to_string(),
            category: "Pesquisa".to_string(),
            pro: true,
        },
    ]
}
