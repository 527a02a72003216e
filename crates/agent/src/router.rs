//! Strategy routing for chat messages.
//!
//! A message goes down the agentic path only when it contains one of a fixed
//! set of "complex intent" phrases: comparisons, multi-step planning, explicit
//! requests for a custom program. Everything else is answered directly.

use serde::{Deserialize, Serialize};

/// Where a chat message is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// One model call on a stand-alone prompt
    Direct,
    /// The bounded tool loop
    Agentic,
}

/// Built-in complex-intent phrases, matched as lowercase substrings.
pub const COMPLEX_PATTERNS: &[&str] = &[
    // comparisons
    "compar",
    "versus",
    " vs ",
    "différence entre",
    "difference between",
    // multi-step planning
    "planifie",
    "planifier",
    "plan my",
    "étape par étape",
    "step by step",
    "périodisation",
    "periodization",
    "sur plusieurs semaines",
    // custom program requests
    "programme personnalisé",
    "programme sur mesure",
    "crée-moi",
    "crée moi",
    "créer un programme",
    "construis",
    "build me",
    "custom program",
    "training plan",
    // formatting requests
    "tableau",
];

/// Decides the strategy from the raw message alone. Holds no state besides
/// its pattern list, so routing is deterministic.
#[derive(Debug, Clone)]
pub struct Router {
    patterns: Vec<String>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            patterns: COMPLEX_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Add phrases on top of the built-in set. Blank phrases are ignored.
    pub fn with_extra_patterns<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.patterns.extend(
            extra
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .filter(|p| !p.trim().is_empty()),
        );
        self
    }

    pub fn route(&self, message: &str) -> Route {
        let lowered = message.to_lowercase();
        if self.patterns.iter().any(|p| lowered.contains(p.as_str())) {
            Route::Agentic
        } else {
            Route::Direct
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_question_is_direct() {
        let router = Router::new();
        assert_eq!(
            router.route("Quel est le meilleur exercice pour les ischio-jambiers?"),
            Route::Direct
        );
        assert_eq!(router.route("Combien de protéines par jour ?"), Route::Direct);
        assert_eq!(router.route(""), Route::Direct);
    }

    #[test]
    fn complex_intent_is_agentic() {
        let router = Router::new();
        for message in [
            "Compare deux approches de périodisation et planifie un programme",
            "Crée-moi un programme de 10 semaines",
            "Build me a custom program for a half marathon",
            "Squat VS soulevé de terre ?",
            "Mets mon plan dans un TABLEAU",
        ] {
            assert_eq!(router.route(message), Route::Agentic, "{message}");
        }
    }

    #[test]
    fn routing_is_deterministic() {
        let router = Router::new();
        let message = "Explique la différence entre VMA et seuil";
        let first = router.route(message);
        for _ in 0..10 {
            assert_eq!(router.route(message), first);
        }
    }

    #[test]
    fn extra_patterns_extend_the_set() {
        let router = Router::new().with_extra_patterns(["Semaine Type", "  "]);
        assert_eq!(router.route("Donne-moi une semaine type"), Route::Agentic);
        assert_eq!(router.route("Bonjour"), Route::Direct);
    }
}
