//! Prompt templates. All prompts are in French, the product's language.

use athly_core::capability::{DetailRequest, StructureRequest, TableFormat, TableView};

pub fn advice(query: &str, context: &str) -> String {
    format!(
        "Tu es un expert en sciences du sport et en programmation de l'entraînement. \
Réponds à la question ci-dessous de façon précise et détaillée, en t'appuyant sur les \
connaissances scientifiques actuelles et les bonnes pratiques d'entraînement.

Informations de référence par discipline :
{context}

Question : {query}"
    )
}

/// Retrieval query for the structure stage.
pub fn structure_query(request: &StructureRequest) -> String {
    format!(
        "programming {} {} {} {} weeks",
        request.disciplines.join(", "),
        request.level,
        request.goals,
        request.duration_weeks
    )
}

pub fn structure(request: &StructureRequest, context: &str) -> String {
    format!(
        "Tu es un coach spécialisé en programmation de l'entraînement. Construis la structure \
d'un programme pour les paramètres suivants :

DISCIPLINES : {disciplines}
DURÉE : {duration} semaines
NIVEAU : {level}
OBJECTIFS : {goals}

Applique les principes de périodisation et de progression sur toute la durée. Indique :
1. Les grandes phases du programme (préparation, développement, spécifique, etc.)
2. L'objectif de chaque phase ou bloc de semaines
3. La répartition des types de séances sur la durée totale
4. L'évolution du volume et de l'intensité

Références utiles :
{context}

Présente la réponse de façon structurée en séparant clairement chaque phase.",
        disciplines = request.disciplines.join(", "),
        duration = request.duration_weeks,
        level = request.level,
        goals = request.goals,
    )
}

pub fn detail(request: &DetailRequest) -> String {
    format!(
        "Tu es un coach expert en programmation de l'entraînement. Détaille le programme \
ci-dessous avec des exercices précis, des séries et répétitions, des durées et des intensités.

STRUCTURE DU PROGRAMME :
{structure}

CONTRAINTES :
- Contraintes physiques ou médicales : {constraints}
- Équipement disponible : {equipment}
- Fréquence : {frequency} séances par semaine
- Durée par séance : {time} minutes

Pour chaque semaine, précise :
1. Les séances jour par jour
2. Les exercices de chaque séance
3. Séries, répétitions et récupérations pour le renforcement
4. Durées, distances et intensités pour le cardio
5. Des variantes selon l'équipement
6. Des consignes techniques d'exécution

La progression doit rester logique et adaptée au niveau indiqué dans la structure. \
Utilise des tableaux pour faciliter la lecture.",
        structure = request.structure,
        constraints = request.constraints,
        equipment = request.equipment,
        frequency = request.frequency,
        time = request.time_per_session,
    )
}

const MARKDOWN_TEMPLATE: &str = "## Planning hebdomadaire

| Jour | Type de séance | Détails | Durée |
|------|----------------|---------|-------|
| Lundi | Musculation | Exercices, séries, répétitions | 60 min |
| Mercredi | Course | Distance, intensité, intervalles | 45 min |
| Vendredi | Poids de corps | Exercices, séries, récupération | 30 min |

## Détail des exercices

| Exercice | Séries | Répétitions | Récupération | Notes |
|----------|--------|-------------|--------------|-------|
| Squat | 4 | 8-10 | 2 min | Technique, progression |";

const HTML_TEMPLATE: &str = "<table class=\"program-table\">
  <thead>
    <tr><th>Jour</th><th>Type de séance</th><th>Détails</th><th>Durée</th></tr>
  </thead>
  <tbody>
    <tr><td>Lundi</td><td>Musculation</td><td>Exercices, séries, répétitions</td><td>60 min</td></tr>
  </tbody>
</table>";

pub fn format_template(format: TableFormat) -> &'static str {
    match format {
        TableFormat::Markdown => MARKDOWN_TEMPLATE,
        TableFormat::Html => HTML_TEMPLATE,
    }
}

pub fn table(program: &str, format: TableFormat, view: TableView) -> String {
    match view {
        TableView::Full => format!(
            "Tu es spécialiste de la mise en forme de programmes d'entraînement. Transforme les \
données brutes ci-dessous en tableaux clairs et faciles à lire.

DONNÉES DU PROGRAMME :
{program}

FORMAT ATTENDU :
{template}

Consignes :
1. Respecte le format ci-dessus
2. Organise par semaine, par jour puis par type d'exercice
3. Conserve tous les détails (exercices, séries, répétitions, durées, intensités)
4. Rends la progression visible
5. Ajoute titres et sous-titres
6. Crée plusieurs tableaux si nécessaire

Produis maintenant le tableau complet.",
            template = format_template(format),
        ),
        TableView::WeeklySchedule => format!(
            "Crée un tableau hebdomadaire à partir des données suivantes :

{program}

Le tableau indique chaque jour de la semaine, le type de séance et un résumé des exercices \
clés ou de l'objectif de la séance.

{}",
            output_line(format)
        ),
        TableView::ExerciseDetails => format!(
            "Crée un tableau détaillé pour les exercices suivants :

{program}

Pour chaque exercice, indique :
- Le nom
- Séries et répétitions, ou durée
- Intensité ou charge
- Récupération
- Notes techniques ou variantes

{}",
            output_line(format)
        ),
        TableView::Overview => format!(
            "Crée un tableau récapitulatif du programme suivant :

{program}

Le tableau montre la progression semaine par semaine avec les objectifs et les axes de \
travail de chaque semaine ou bloc.

{}",
            output_line(format)
        ),
    }
}

fn output_line(format: TableFormat) -> &'static str {
    match format {
        TableFormat::Markdown => "Présente le tableau en Markdown.",
        TableFormat::Html => "Présente le tableau en HTML.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure_request() -> StructureRequest {
        StructureRequest {
            disciplines: vec!["running".into(), "strength".into()],
            duration_weeks: 12,
            level: "intermediate".into(),
            goals: "semi-marathon".into(),
        }
    }

    #[test]
    fn structure_query_lists_parameters() {
        assert_eq!(
            structure_query(&structure_request()),
            "programming running, strength intermediate semi-marathon 12 weeks"
        );
    }

    #[test]
    fn structure_prompt_embeds_context() {
        let prompt = structure(&structure_request(), "Bloc 1: base aérobie");
        assert!(prompt.contains("DURÉE : 12 semaines"));
        assert!(prompt.contains("Bloc 1: base aérobie"));
    }

    #[test]
    fn table_prompt_uses_format_template() {
        let md = table("S1: footing", TableFormat::Markdown, TableView::Full);
        assert!(md.contains("| Jour |"));
        let html = table("S1: footing", TableFormat::Html, TableView::Full);
        assert!(html.contains("<table"));
        assert!(html.contains("S1: footing"));
    }

    #[test]
    fn view_prompts_differ() {
        let weekly = table("data", TableFormat::Markdown, TableView::WeeklySchedule);
        let overview = table("data", TableFormat::Markdown, TableView::Overview);
        assert!(weekly.contains("hebdomadaire"));
        assert!(overview.contains("récapitulatif"));
        assert!(table("data", TableFormat::Html, TableView::ExerciseDetails).contains("HTML"));
    }
}
