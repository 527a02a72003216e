//! Built-in coaching notes used to seed a fresh store.

/// (source, content) pairs.
pub const SAMPLE_NOTES: &[(&str, &str)] = &[
    (
        "samples/running/beginner_program.md",
        "# Programmation course à pied - niveau débutant (running, beginner)

## Principes généraux
Construire progressivement l'endurance aérobie et laisser le corps s'adapter aux impacts.
La progression reste graduelle pour éviter les blessures des tendons et articulations.

## Structure de base (8-12 semaines)
- Semaines 1-3: introduction, alternance marche/course
- Semaines 4-6: développement, augmentation du temps de course
- Semaines 7-10: consolidation, courses continues plus longues
- Semaines 11-12: test et évaluation des progrès

## Exemples d'exercices
- Alternance marche (2 min) / course (1 min)
- Course lente continue (60-70% FCMax)
- Fartleks légers
- Éducatifs: skipping, talons-fesses

## Progression du volume
- Semaine 1: 3 séances de 20 minutes
- Semaine 4: 3 séances de 30 minutes
- Semaine 8: 3-4 séances de 30-40 minutes
- Semaine 12: 3-4 séances dont une de 45-60 minutes",
    ),
    (
        "samples/bodyweight/intermediate_program.md",
        "# Programmation poids de corps - niveau intermédiaire (bodyweight, intermediate)

## Principes généraux
Progression en difficulté des exercices, augmentation du volume et variations plus complexes.

## Structure de base (12-16 semaines)
- Semaines 1-3: évaluation et reprise
- Semaines 4-8: développement de la force
- Semaines 9-12: endurance musculaire et explosivité
- Semaines 13-16: mouvements complexes

## Exemples d'exercices
- Pompes diamant, déclinées, archer
- Pistol squats partiels
- Tractions avec variations de prise
- Dips, burpees avec saut, L-sit

## Progression du volume
- Semaine 1: 3 séances, 3 séries par exercice, RPE 7/10
- Semaine 6: 4 séances, 4 séries par exercice, RPE 8/10
- Semaine 12: 4-5 séances avec supersets et circuits, RPE 8-9/10",
    ),
    (
        "samples/strength/advanced_program.md",
        "# Programmation musculation - niveau avancé (strength, advanced)

## Principes généraux
Périodisation, variation des volumes et intensités, méthodes d'intensification spécifiques.

## Structure de base (16 semaines)
- Semaines 1-4: volume (hypertrophie)
- Semaines 5-8: force
- Semaines 9-12: puissance
- Semaines 13-14: pic d'intensité
- Semaines 15-16: décharge active

## Progression du volume et de l'intensité
- Volume: 4-5 séances/semaine, 4-5 séries, 8-12 reps, 60-75% 1RM
- Force: 4 séances/semaine, 5-6 séries, 3-6 reps, 80-90% 1RM
- Puissance: 4 séances/semaine, 3-4 séries, 2-5 reps, 85-95% 1RM
- Pic: 3 séances/semaine, 2-3 séries, 1-3 reps, 90-100% 1RM
- Décharge: 2-3 séances/semaine, 2-3 séries, 8-10 reps, 50-60% 1RM",
    ),
    (
        "samples/periodization.md",
        "# Périodisation et programming (periodization)

Un programme de 8 à 16 semaines se découpe en mésocycles de 3 à 5 semaines.
Chaque mésocycle se termine par une semaine de décharge où le volume baisse de 40 à 50%.
La charge progresse de 5 à 10% par semaine au maximum.
Pour les objectifs mixtes (course et musculation), placer les séances intenses à 48 heures d'écart.",
    ),
    (
        "samples/exercises/basic_exercises.md",
        "Exercice: Squat
Type: polyarticulaire
Muscles ciblés: quadriceps, ischio-jambiers, fessiers
Niveau: tous niveaux
Instructions: pieds largeur d'épaules, descendre jusqu'à cuisses parallèles au sol, dos droit, remonter.

Exercice: Pompes
Type: polyarticulaire
Muscles ciblés: pectoraux, triceps, épaules, gainage
Niveau: tous niveaux
Instructions: en planche, abaisser la poitrine près du sol en pliant les coudes, puis pousser.

Exercice: Foulées
Type: technique de course
Muscles ciblés: quadriceps, ischio-jambiers, fessiers, mollets
Niveau: débutant
Instructions: attaque médio-pied, cadence 170-180 pas par minute, épaules relâchées.",
    ),
];
