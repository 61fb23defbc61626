//! Integration tests for recording results: routing, finals, elimination.

use double_elim_bracket::{
    generate_bracket, generate_bracket_in_order, get_rankings, record_result, Slot, Tournament,
    TournamentError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn four_teams() -> Tournament {
    generate_bracket_in_order(&names(&["A", "B", "C", "D"])).unwrap()
}

fn slots(t: &Tournament, id: &str) -> (Slot, Slot) {
    let m = t.find_match(id).unwrap();
    (m.team1.clone(), m.team2.clone())
}

fn placement(t: &Tournament, team: &str) -> Option<u32> {
    get_rankings(t)
        .into_iter()
        .find(|e| e.team == team)
        .and_then(|e| e.placement)
}

/// Play every ready match in bracket order, picking winners with `rng`,
/// until nothing is left to play.
fn play_out(t: &mut Tournament, rng: &mut StdRng) {
    loop {
        let next = t
            .bracket()
            .matches()
            .find(|m| !t.is_decided(&m.id) && m.team1.is_team() && m.team2.is_team())
            .map(|m| (m.id.clone(), m.team1.clone(), m.team2.clone()));
        let Some((id, team1, team2)) = next else {
            break;
        };
        let winner = if rng.gen_bool(0.5) { team1 } else { team2 };
        record_result(t, &id, &winner.to_string()).unwrap();
        assert!(t.stranded_teams().is_empty(), "stranded after {id}");
    }
}

#[test]
fn four_team_run_to_champion() {
    let mut t = four_teams();

    record_result(&mut t, "W1-1", "A").unwrap();
    record_result(&mut t, "W1-2", "C").unwrap();
    assert_eq!(slots(&t, "W2-1"), (Slot::team("A"), Slot::team("C")));
    assert_eq!(slots(&t, "L1-1"), (Slot::team("B"), Slot::team("D")));

    record_result(&mut t, "W2-1", "A").unwrap();
    assert_eq!(slots(&t, "F1").0, Slot::team("A"));
    assert_eq!(slots(&t, "L2-1").0, Slot::team("C"));

    record_result(&mut t, "L1-1", "B").unwrap();
    assert_eq!(slots(&t, "L2-1"), (Slot::team("C"), Slot::team("B")));
    assert!(t.is_eliminated("D"));

    record_result(&mut t, "L2-1", "B").unwrap();
    assert_eq!(slots(&t, "F1"), (Slot::team("A"), Slot::team("B")));

    record_result(&mut t, "F1", "A").unwrap();
    assert_eq!(t.champion(), Some("A"));
    assert!(t.is_complete());
    // no reset needed
    assert!(slots(&t, "F2").0.is_tbd());
    assert!(!t.is_decided("F2"));

    assert_eq!(t.loss_count("A"), 0);
    assert_eq!(t.loss_count("B"), 2);
    assert_eq!(t.loss_count("C"), 2);
    assert_eq!(t.loss_count("D"), 2);

    assert_eq!(placement(&t, "A"), Some(1));
    assert_eq!(placement(&t, "B"), Some(2));
    assert_eq!(placement(&t, "C"), Some(3));
    assert_eq!(placement(&t, "D"), Some(4));
}

#[test]
fn grand_finals_reset_when_losers_side_wins_f1() {
    let mut t = four_teams();
    for (id, winner) in [("W1-1", "A"), ("W1-2", "C"), ("W2-1", "A"), ("L1-1", "B"), ("L2-1", "B")] {
        record_result(&mut t, id, winner).unwrap();
    }
    record_result(&mut t, "F1", "B").unwrap();
    assert!(t.champion().is_none());
    assert_eq!(slots(&t, "F2"), (Slot::team("A"), Slot::team("B")));
    assert_eq!(t.loss_count("A"), 1);
    assert_eq!(t.loss_count("B"), 1);
    assert!(!t.stranded_teams().contains(&"A".to_string()));

    record_result(&mut t, "F2", "B").unwrap();
    assert_eq!(t.champion(), Some("B"));
    assert_eq!(t.loss_count("A"), 2);
    assert_eq!(placement(&t, "B"), Some(1));
    assert_eq!(placement(&t, "A"), Some(2));
}

#[test]
fn two_team_bracket_sends_loser_to_f1() {
    let mut t = generate_bracket_in_order(&names(&["A", "B"])).unwrap();
    assert!(t.bracket().losers.is_empty());

    record_result(&mut t, "W1-1", "A").unwrap();
    assert_eq!(slots(&t, "F1"), (Slot::team("A"), Slot::team("B")));

    record_result(&mut t, "F1", "B").unwrap();
    assert_eq!(slots(&t, "F2"), (Slot::team("A"), Slot::team("B")));

    record_result(&mut t, "F2", "B").unwrap();
    assert_eq!(t.champion(), Some("B"));
    assert_eq!(t.loss_count("A"), 2);
    assert_eq!(t.loss_count("B"), 1);
}

#[test]
fn record_result_rejects_bad_requests() {
    let mut t = four_teams();

    assert_eq!(
        record_result(&mut t, "W7-1", "A"),
        Err(TournamentError::UnknownMatch("W7-1".to_string()))
    );
    assert!(matches!(
        record_result(&mut t, "W1-1", "C"),
        Err(TournamentError::InvalidWinner { .. })
    ));
    assert!(matches!(
        record_result(&mut t, "W1-1", "BYE"),
        Err(TournamentError::InvalidWinner { .. })
    ));
    // both slots still TBD: nobody can be named winner yet
    assert!(matches!(
        record_result(&mut t, "W2-1", "A"),
        Err(TournamentError::InvalidWinner { .. })
    ));

    record_result(&mut t, "W1-1", "A").unwrap();
    assert_eq!(
        record_result(&mut t, "W1-1", "B"),
        Err(TournamentError::AlreadyDecided("W1-1".to_string()))
    );
    assert_eq!(
        record_result(&mut t, "W2-1", "A"),
        Err(TournamentError::MatchNotReady("W2-1".to_string()))
    );
}

#[test]
fn failed_record_leaves_state_untouched() {
    let mut t = four_teams();
    record_result(&mut t, "W1-1", "A").unwrap();
    let before = t.clone();
    let _ = record_result(&mut t, "W2-1", "A");
    let _ = record_result(&mut t, "W1-2", "Z");
    assert_eq!(t, before);
}

#[test]
fn eight_team_losers_bracket_routing() {
    let teams = names(&["A", "B", "C", "D", "E", "F", "G", "H"]);
    let mut t = generate_bracket_in_order(&teams).unwrap();
    for (id, winner) in [("W1-1", "A"), ("W1-2", "C"), ("W1-3", "E"), ("W1-4", "G")] {
        record_result(&mut t, id, winner).unwrap();
    }
    assert_eq!(slots(&t, "L1-1"), (Slot::team("B"), Slot::team("D")));
    assert_eq!(slots(&t, "L1-2"), (Slot::team("F"), Slot::team("H")));

    record_result(&mut t, "W2-1", "A").unwrap();
    record_result(&mut t, "W2-2", "G").unwrap();
    // W2 losers drop into L2, one per match
    assert_eq!(slots(&t, "L2-1").0, Slot::team("C"));
    assert_eq!(slots(&t, "L2-2").0, Slot::team("E"));

    record_result(&mut t, "L1-1", "D").unwrap();
    record_result(&mut t, "L1-2", "F").unwrap();
    assert_eq!(slots(&t, "L2-1"), (Slot::team("C"), Slot::team("D")));
    assert_eq!(slots(&t, "L2-2"), (Slot::team("E"), Slot::team("F")));

    record_result(&mut t, "W3-1", "G").unwrap();
    assert_eq!(slots(&t, "F1").0, Slot::team("G"));
    // winners final loser waits in L4
    assert_eq!(slots(&t, "L4-1").0, Slot::team("A"));
}

#[test]
fn random_tournaments_finish_with_two_losses_per_eliminated_team() {
    for n in 2..=33usize {
        let teams: Vec<String> = (0..n).map(|i| format!("P{i}")).collect();
        let mut rng = StdRng::seed_from_u64(n as u64 * 31);
        let mut t = generate_bracket(&teams, Some(n as u64)).unwrap();
        play_out(&mut t, &mut rng);

        let champion = t.champion().map(str::to_string);
        let champion = champion.unwrap_or_else(|| panic!("n={n}: no champion"));
        assert!(teams.contains(&champion));
        assert!(t.loss_count(&champion) <= 1, "n={n}");
        for team in &teams {
            if *team != champion {
                assert_eq!(t.loss_count(team), 2, "n={n} team={team}");
            }
        }

        let contested = t.results().values().filter(|r| r.is_contested()).count() as u32;
        let wins: u32 = get_rankings(&t).iter().map(|e| e.wins).sum();
        assert_eq!(wins, contested, "n={n}");
    }
}

#[test]
fn always_top_slot_winning_also_completes() {
    for n in [5usize, 9, 17, 31] {
        let teams: Vec<String> = (0..n).map(|i| format!("Q{i}")).collect();
        let mut t = generate_bracket_in_order(&teams).unwrap();
        loop {
            let next = t
                .bracket()
                .matches()
                .find(|m| !t.is_decided(&m.id) && m.team1.is_team() && m.team2.is_team())
                .map(|m| (m.id.clone(), m.team1.to_string()));
            let Some((id, winner)) = next else {
                break;
            };
            record_result(&mut t, &id, &winner).unwrap();
        }
        assert!(t.is_complete(), "n={n}");
        assert!(t.stranded_teams().is_empty());
    }
}
