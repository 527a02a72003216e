//! Prompts used by the orchestration core itself.

use athly_core::capability::CapabilityDescriptor;

/// The stand-alone prompt of the direct strategy: no history, no capabilities.
pub fn direct(message: &str) -> String {
    format!(
        "Tu es Athly, un coach sportif expert en sciences du sport. Réponds à la question \
ci-dessous de façon claire, précise et bienveillante. Structure ta réponse avec des listes \
ou des titres lorsque c'est utile.

Question : {message}"
    )
}

/// System prompt of the agentic strategy.
pub fn agentic_system(
    capabilities: &[CapabilityDescriptor],
    context: &serde_json::Map<String, serde_json::Value>,
) -> String {
    let tools = capabilities
        .iter()
        .map(|c| format!("- {}: {}", c.name, c.description))
        .collect::<Vec<_>>()
        .join("\n");
    let names = capabilities
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "Tu es Athly, un coach sportif qui s'appuie sur des outils spécialisés pour répondre aux \
demandes complexes : comparaisons, planification sur plusieurs semaines, programmes \
personnalisés.

Outils disponibles :
{tools}

Pour utiliser un outil, réponds UNIQUEMENT avec un bloc JSON :
```json
{{\"thought\": \"ce que tu cherches à faire\", \"action\": \"<un de : {names}>\", \"action_input\": \"...\"}}
```
Tu peux demander plusieurs outils dans la même réponse, un bloc par outil ; ils seront \
exécutés dans l'ordre. Le résultat de chaque outil te sera renvoyé sous la forme \
\"Observation [outil]: ...\".

Quand tu as assez d'informations, donne ta réponse finale en texte libre, ou avec :
```json
{{\"thought\": \"j'ai tout ce qu'il faut\", \"action\": \"Final Answer\", \"action_input\": \"ta réponse\"}}
```"
    );

    if !context.is_empty() {
        prompt.push_str("\n\nContexte de l'utilisateur :\n");
        for (key, value) in context {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            prompt.push_str(&format!("- {key}: {value}\n"));
        }
    }

    prompt
}

/// Corrective note when the model names a capability that does not exist.
pub fn unknown_capability(name: &str, known: &[&str]) -> String {
    format!(
        "Erreur : l'outil '{name}' n'existe pas. Outils disponibles : {}. \
Choisis un de ces outils ou donne ta réponse finale.",
        known.join(", ")
    )
}

/// Corrective note when a request could not be understood.
pub fn invalid_request(problem: &str) -> String {
    format!(
        "Erreur : ta demande d'outil n'a pas pu être interprétée ({problem}). Utilise exactement \
le format {{\"thought\": ..., \"action\": ..., \"action_input\": ...}} dans un bloc JSON, \
ou donne ta réponse finale."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptors() -> Vec<CapabilityDescriptor> {
        vec![
            CapabilityDescriptor {
                name: "expert_sport".into(),
                description: "Conseils".into(),
            },
            CapabilityDescriptor {
                name: "table_generator".into(),
                description: "Tableaux".into(),
            },
        ]
    }

    #[test]
    fn system_prompt_lists_capabilities() {
        let prompt = agentic_system(&descriptors(), &serde_json::Map::new());
        assert!(prompt.contains("- expert_sport: Conseils"));
        assert!(prompt.contains("<un de : expert_sport, table_generator>"));
        assert!(prompt.contains("Final Answer"));
        assert!(!prompt.contains("Contexte de l'utilisateur"));
    }

    #[test]
    fn system_prompt_renders_context() {
        let mut context = serde_json::Map::new();
        context.insert("niveau".into(), json!("débutant"));
        context.insert("séances".into(), json!(3));
        let prompt = agentic_system(&descriptors(), &context);
        assert!(prompt.contains("- niveau: débutant"));
        assert!(prompt.contains("- séances: 3"));
    }

    #[test]
    fn corrective_notes_name_the_problem() {
        let note = unknown_capability("nutrition", &["expert_sport", "table_generator"]);
        assert!(note.contains("'nutrition'"));
        assert!(note.contains("expert_sport, table_generator"));
        assert!(invalid_request("JSON invalide").contains("JSON invalide"));
    }
}
