//! Built-in classic games.
//!
//! Each model uses its canonical id, so [`Variant::recognize`] tags it with
//! the matching family without an explicit `variant` field.
use crate::*;

/// Every built-in model.
pub fn all() -> Vec<GameModel> {
    vec![
        prisoners_dilemma(),
        smart_pig(),
        matching_pennies(),
        battle_of_sexes(),
        stackelberg(),
        signaling_game(),
        bayesian_game(),
    ]
}

/// Built-in model by id.
pub fn find(id: &str) -> Option<GameModel> {
    all().into_iter().find(|model| model.id() == id)
}

/// Both prisoners are better off defecting whatever the other does.
pub fn prisoners_dilemma() -> GameModel {
    GameModel::new(
        "prisoners-dilemma",
        "Prisoner's Dilemma",
        GameType::CompleteStatic,
        vec![
            Player::new("alice", "Alice", &["cooperate", "defect"]),
            Player::new("bob", "Bob", &["cooperate", "defect"]),
        ],
        PayoffMatrix::default()
            .with(&["cooperate", "cooperate"], &[-1., -1.])
            .with(&["cooperate", "defect"], &[-3., 0.])
            .with(&["defect", "cooperate"], &[0., -3.])
            .with(&["defect", "defect"], &[-2., -2.]),
    )
    .with_rounds(10, 50)
}

/// Boxed pigs: the small pig waits, the big pig presses the lever.
pub fn smart_pig() -> GameModel {
    GameModel::new(
        "smart-pig",
        "Smart Pig",
        GameType::CompleteStatic,
        vec![
            Player::new("big", "Big Pig", &["press", "wait"]),
            Player::new("small", "Small Pig", &["press", "wait"]),
        ],
        PayoffMatrix::default()
            .with(&["press", "press"], &[5., 1.])
            .with(&["press", "wait"], &[4., 4.])
            .with(&["wait", "press"], &[9., -1.])
            .with(&["wait", "wait"], &[0., 0.]),
    )
    .with_rounds(10, 50)
}

/// Zero-sum coin matching with no pure equilibrium.
pub fn matching_pennies() -> GameModel {
    GameModel::new(
        "matching-pennies",
        "Matching Pennies",
        GameType::CompleteStatic,
        vec![
            Player::new("even", "Even", &["heads", "tails"]),
            Player::new("odd", "Odd", &["heads", "tails"]),
        ],
        PayoffMatrix::default()
            .with(&["heads", "heads"], &[1., -1.])
            .with(&["heads", "tails"], &[-1., 1.])
            .with(&["tails", "heads"], &[-1., 1.])
            .with(&["tails", "tails"], &[1., -1.]),
    )
    .with_rounds(20, 100)
}

/// Coordination with conflicting favorites.
pub fn battle_of_sexes() -> GameModel {
    GameModel::new(
        "battle-of-sexes",
        "Battle of the Sexes",
        GameType::CompleteStatic,
        vec![
            Player::new("ann", "Ann", &["opera", "football"]),
            Player::new("bo", "Bo", &["opera", "football"]),
        ],
        PayoffMatrix::default()
            .with(&["opera", "opera"], &[2., 1.])
            .with(&["opera", "football"], &[0., 0.])
            .with(&["football", "opera"], &[0., 0.])
            .with(&["football", "football"], &[1., 2.]),
    )
    .with_rounds(20, 100)
}

/// Quantity leadership with profits `q·(12 - Q)` for outputs 3, 4 and 6.
pub fn stackelberg() -> GameModel {
    let outputs = [("low", 3.), ("medium", 4.), ("high", 6.)];
    let payoffs = outputs
        .iter()
        .flat_map(|&(lead, q1)| {
            outputs.iter().map(move |&(follow, q2)| {
                let price = 12. - q1 - q2;
                (vec![lead, follow], vec![q1 * price, q2 * price])
            })
        })
        .collect::<PayoffMatrix>();
    GameModel::new(
        "stackelberg",
        "Stackelberg Duopoly",
        GameType::CompleteDynamic,
        vec![
            Player::new("leader", "Leader", &["low", "medium", "high"]),
            Player::new("follower", "Follower", &["low", "medium", "high"]),
        ],
        payoffs,
    )
    .with_rounds(5, 30)
}

/// Job-market signaling: education is cheap for able workers only.
pub fn signaling_game() -> GameModel {
    GameModel::new(
        "signaling-game",
        "Job Market Signaling",
        GameType::IncompleteDynamic,
        vec![
            Player::new("worker", "Worker", &["educate", "idle"])
                .typed(PlayerType::new("high", 0.5))
                .typed(PlayerType::new("low", 0.5).biased("educate", -3.)),
            Player::new("firm", "Firm", &["hire", "reject"]),
        ],
        PayoffMatrix::default()
            .with(&["educate", "hire"], &[6., 4.])
            .with(&["educate", "reject"], &[-2., 0.])
            .with(&["idle", "hire"], &[4., -1.])
            .with(&["idle", "reject"], &[1., 0.]),
    )
    .with_rounds(10, 60)
}

/// Market entry against an incumbent of unknown strength.
pub fn bayesian_game() -> GameModel {
    GameModel::new(
        "bayesian-game",
        "Entry Deterrence",
        GameType::IncompleteStatic,
        vec![
            Player::new("entrant", "Entrant", &["enter", "stay-out"]),
            Player::new("incumbent", "Incumbent", &["fight", "accommodate"])
                .typed(PlayerType::new("strong", 0.4).biased("fight", 3.))
                .typed(PlayerType::new("weak", 0.6)),
        ],
        PayoffMatrix::default()
            .with(&["enter", "fight"], &[-1., -1.])
            .with(&["enter", "accommodate"], &[2., 1.])
            .with(&["stay-out", "fight"], &[0., 2.])
            .with(&["stay-out", "accommodate"], &[0., 2.]),
    )
    .with_rounds(10, 60)
}
