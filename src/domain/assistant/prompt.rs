//! Prompt construction for the legal assistant
//!
//! All prompts are written in Spanish and framed around Ley 21.719.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const EXPERT_INTRO: &str =
    "Eres un experto en la ley 21.719 de protección de datos de Chile.";

const ANSWER_IN_SPANISH: &str =
    "Responde en español, usando la información de la ley y buenas prácticas.";

/// Who the chat answer is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// Developers and computer science students
    Dev,
    /// Readers without technical background
    #[default]
    General,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "general" => Ok(Self::General),
            other => Err(DomainError::validation(format!(
                "Unknown user_type '{}', expected 'dev' or 'general'",
                other
            ))),
        }
    }
}

/// Chat prompt for a free-form question
pub fn build_chat_prompt(audience: Audience, message: &str) -> String {
    let framing = match audience {
        Audience::Dev => {
            "Responde de manera clara, técnica y detallada para un público con conocimientos \
             en tecnología, como un desarrollador o un estudiante de informática."
        }
        Audience::General => {
            "Estás respondiendo a alguien sin conocimientos técnicos, sé lo más simple y \
             completo posible."
        }
    };

    format!(
        "{EXPERT_INTRO} {framing}\nPregunta del usuario: {message}\n{ANSWER_IN_SPANISH}"
    )
}

/// Compliance evaluation prompt for a project description
pub fn build_evaluation_prompt(description: &str) -> String {
    format!(
        "{EXPERT_INTRO} Tienes que evaluar el siguiente proyecto:\n\
         {description}\n\n\
         Evalúa cumplimiento con la ley de protección de datos 21.719 de Chile. Genera en español:\n\
         1) Una checklist de cumplimiento con base legal, incluyendo los artículos relevantes de la ley. \
         Haz que los puntos de la checklist sean claros y concisos, y que tengan cumplido ✅, \
         no cumplido ❌ o falta más información ❓. Hazla en formato de lista.\n\
         2) Recomendaciones por categoría (Consentimiento, Seguridad, ARCO) con ejemplos de buenas prácticas."
    )
}

/// Follow-up prompt about a previously evaluated project
pub fn build_project_chat_prompt(description: &str, evaluation: &str, message: &str) -> String {
    format!(
        "Proyecto: {description}\n\
         Evaluación y recomendaciones previas: {evaluation}\n\n\
         Pregunta del usuario: {message}\n\
         Responde en español, usando la información del proyecto y las recomendaciones previas."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_parsing() {
        assert_eq!("dev".parse::<Audience>().unwrap(), Audience::Dev);
        assert_eq!(" General ".parse::<Audience>().unwrap(), Audience::General);
        assert!(matches!(
            "lawyer".parse::<Audience>(),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_audience_serde() {
        let audience: Audience = serde_json::from_str("\"dev\"").unwrap();
        assert_eq!(audience, Audience::Dev);
        assert_eq!(serde_json::to_string(&Audience::General).unwrap(), "\"general\"");
    }

    #[test]
    fn test_chat_prompt_framing() {
        let dev = build_chat_prompt(Audience::Dev, "¿Qué es un dato sensible?");
        let general = build_chat_prompt(Audience::General, "¿Qué es un dato sensible?");

        assert!(dev.contains("desarrollador"));
        assert!(general.contains("sin conocimientos técnicos"));
        for prompt in [&dev, &general] {
            assert!(prompt.starts_with(EXPERT_INTRO));
            assert!(prompt.contains("Pregunta del usuario: ¿Qué es un dato sensible?"));
        }
    }

    #[test]
    fn test_evaluation_prompt() {
        let prompt = build_evaluation_prompt("App de delivery que guarda direcciones");

        assert!(prompt.contains("App de delivery que guarda direcciones"));
        assert!(prompt.contains("Consentimiento, Seguridad, ARCO"));
        assert!(prompt.contains('✅'));
    }

    #[test]
    fn test_project_chat_prompt() {
        let prompt = build_project_chat_prompt("CRM", "❌ Falta consentimiento", "¿Qué corrijo?");

        assert!(prompt.starts_with("Proyecto: CRM\n"));
        assert!(prompt.contains("Evaluación y recomendaciones previas: ❌ Falta consentimiento"));
        assert!(prompt.contains("Pregunta del usuario: ¿Qué corrijo?"));
    }
}
