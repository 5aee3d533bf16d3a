use std::sync::Arc;
use std::thread;

use super::common::*;
use crate::error::EngineError;
use crate::progression::domain::GameSummary;
use crate::progression::repository::{ProgressionRepository, RepositoryError};
use crate::progression::{ProgressionService, ProgressionServiceError, XpLedger};

#[test]
fn registering_twice_conflicts() {
    let (service, _, _) = build_service();
    let status = service.register_user(&user("abena")).expect("register");
    assert_eq!(status.current_streak, 1);
    assert_eq!(status.last_activity_date, day(1));
    assert_eq!(status.next_activity_due, Some(day(2)));

    let duplicate = service.register_user(&user("abena"));
    assert!(matches!(
        duplicate,
        Err(ProgressionServiceError::Repository(RepositoryError::Conflict))
    ));
}

#[test]
fn touch_persists_streak_changes() {
    let (service, repository, clock) = build_service();
    let abena = user("abena");
    service.register_user(&abena).expect("register");

    clock.set(at(2, 8));
    assert_eq!(service.touch_streak(&abena).expect("touch").current_streak, 2);
    clock.set(at(2, 22));
    assert_eq!(service.touch_streak(&abena).expect("touch").current_streak, 2);
    clock.set(at(5, 9));
    let after_gap = service.touch_streak(&abena).expect("touch");
    assert_eq!(after_gap.current_streak, 1);
    assert_eq!(after_gap.longest_streak, 2);

    let stored = repository
        .streaks
        .lock()
        .expect("repository mutex poisoned")
        .get(&abena)
        .cloned()
        .expect("record stored");
    assert_eq!(stored.last_activity_date, day(5));
}

#[test]
fn first_touch_starts_a_streak_for_unknown_players() {
    let (service, _, clock) = build_service();
    clock.set(at(3, 10));

    let status = service.touch_streak(&user("kwame")).expect("touch");

    assert_eq!(status.current_streak, 1);
    assert_eq!(status.longest_streak, 1);
    assert_eq!(status.last_activity_date, day(3));
}

#[test]
fn repeated_touches_on_one_day_cannot_build_a_streak() {
    let (service, _, _) = build_service();
    let kwame = user("kwame");
    service.register_user(&kwame).expect("register");

    for _ in 0..30 {
        service.touch_streak(&kwame).expect("touch");
    }

    let status = service.streak(&kwame).expect("streak");
    assert_eq!(status.current_streak, 1);
    assert_eq!(status.xp_multiplier, 1.0);
}

#[test]
fn touch_rejects_a_clock_behind_the_last_recorded_day() {
    let (service, _, clock) = build_service();
    let kwame = user("kwame");
    clock.set(at(10, 9));
    service.register_user(&kwame).expect("register");

    clock.set(at(9, 9));
    let result = service.touch_streak(&kwame);

    assert!(matches!(
        result,
        Err(ProgressionServiceError::Engine(EngineError::Validation(_)))
    ));
}

#[test]
fn reset_requires_known_player_and_keeps_longest() {
    let (service, _, clock) = build_service();
    let efua = user("efua");
    assert!(matches!(
        service.reset_streak(&efua),
        Err(ProgressionServiceError::Engine(EngineError::NotFound { .. }))
    ));

    service.register_user(&efua).expect("register");
    clock.set(at(2, 12));
    service.touch_streak(&efua).expect("touch");
    clock.set(at(3, 12));
    service.touch_streak(&efua).expect("touch");

    let reset = service.reset_streak(&efua).expect("reset");
    assert_eq!(reset.current_streak, 1);
    assert_eq!(reset.longest_streak, 3);
    assert_eq!(reset.last_activity_date, day(3));
}

#[test]
fn grant_applies_streak_multiplier_after_touch() {
    let (service, _, clock) = build_service();
    let yaa = user("yaa");
    service.register_user(&yaa).expect("register");
    for d in 2..=6 {
        clock.set(at(d, 12));
        service.touch_streak(&yaa).expect("touch");
    }

    // day 7 extends the streak to 7, which unlocks the 1.25 multiplier
    clock.set(at(7, 18));
    let award = service.grant_xp(&yaa, 100, "debate_round").expect("grant");

    assert_eq!(award.current_streak, 7);
    assert_eq!(award.xp_multiplier, 1.25);
    assert_eq!(award.grant.final_amount, 125);
    assert_eq!(award.grant.base_amount, 100);
    assert_eq!(award.grant.timestamp, at(7, 18));
}

#[test]
fn grants_accumulate_into_levels() {
    let (service, repository, _) = build_service();
    let nana = user("nana");

    let first = service.grant_xp(&nana, 600, "debate_round").expect("grant");
    assert_eq!(first.level, 1);
    assert!(!first.leveled_up);

    let second = service.grant_xp(&nana, 500, "debate_round").expect("grant");
    assert_eq!(second.level, 2);
    assert!(second.leveled_up);

    let progress = service.level(&nana).expect("level");
    assert_eq!(progress.level, 2);
    assert_eq!(progress.total_xp, 1100);
    assert_eq!(progress.next_level_at, 3000);

    let stored = repository.grants(&nana).expect("grants");
    assert_eq!(XpLedger::total(&stored), 1100);
}

#[test]
fn grant_rejects_blank_activity_without_touching_ledger() {
    let (service, repository, _) = build_service();
    let nana = user("nana");

    let result = service.grant_xp(&nana, 50, "  ");

    assert!(matches!(
        result,
        Err(ProgressionServiceError::Engine(EngineError::Validation(_)))
    ));
    assert!(repository.grants(&nana).expect("grants").is_empty());
    assert!(service.streak(&nana).is_err());
}

#[test]
fn level_for_unknown_player_is_not_found() {
    let (service, _, _) = build_service();

    match service.level(&user("ghost")) {
        Err(ProgressionServiceError::Engine(EngineError::NotFound { entity, id })) => {
            assert_eq!(entity, "user");
            assert_eq!(id, "ghost");
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn manual_award_is_idempotent_until_revoked() {
    let (service, _, clock) = build_service();
    let kofi = user("kofi");
    service.register_user(&kofi).expect("register");

    let first = service.award_badge(&kofi, "first_win").expect("award");
    assert!(first.awarded);
    let badge = first.badge.expect("badge issued");
    assert_eq!(badge.name, "First Victory");
    assert_eq!(badge.earned_at, at(1, 12));
    assert!(badge.active);

    let again = service.award_badge(&kofi, "first_win").expect("award");
    assert!(!again.awarded);
    assert!(again.badge.is_none());

    let revoked = service.revoke_badge(&kofi, "first_win").expect("revoke");
    assert!(!revoked.active);

    clock.set(at(2, 9));
    let regained = service.award_badge(&kofi, "first_win").expect("award");
    assert!(regained.awarded);

    let all = service.badges(&kofi).expect("list");
    assert_eq!(all.len(), 2);
    assert_eq!(all.iter().filter(|badge| badge.active).count(), 1);
}

#[test]
fn award_and_revoke_trim_the_badge_type_alike() {
    let (service, _, _) = build_service();
    let kofi = user("kofi");
    service.register_user(&kofi).expect("register");

    let award = service.award_badge(&kofi, " creative ").expect("award");
    assert_eq!(award.badge.expect("badge").badge_type, "creative");

    let revoked = service.revoke_badge(&kofi, " creative").expect("revoke");
    assert_eq!(revoked.badge_type, "creative");
    assert!(matches!(
        service.revoke_badge(&kofi, "   "),
        Err(ProgressionServiceError::Engine(EngineError::Validation(_)))
    ));
}

#[test]
fn manual_award_accepts_types_outside_catalog() {
    let (service, _, _) = build_service();
    let kofi = user("kofi");
    service.register_user(&kofi).expect("register");

    let award = service.award_badge(&kofi, "early_bird").expect("award");

    assert_eq!(award.badge.expect("badge").name, "early bird");
}

#[test]
fn award_and_revoke_surface_missing_records() {
    let (service, _, _) = build_service();
    assert!(matches!(
        service.award_badge(&user("ghost"), "first_win"),
        Err(ProgressionServiceError::Engine(EngineError::NotFound { .. }))
    ));

    service.register_user(&user("kofi")).expect("register");
    match service.revoke_badge(&user("kofi"), "perfect") {
        Err(ProgressionServiceError::Engine(EngineError::NotFound { entity, .. })) => {
            assert_eq!(entity, "badge")
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn lookups_for_unknown_players_leave_no_lock_behind() {
    let (service, _, _) = build_service();

    for n in 0..50 {
        let ghost = user(&format!("ghost-{n}"));
        assert!(service.reset_streak(&ghost).is_err());
        assert!(service.award_badge(&ghost, "first_win").is_err());
        assert!(service.revoke_badge(&ghost, "first_win").is_err());
    }
    service.touch_streak(&user("ama")).expect("touch");

    assert_eq!(service.tracked_locks(), 0);
}

#[test]
fn finished_game_unlocks_catalog_badges_once() {
    let (service, _, clock) = build_service();
    let ama = user("ama");
    service.register_user(&ama).expect("register");
    for d in 2..=5 {
        clock.set(at(d, 12));
        service.touch_streak(&ama).expect("touch");
    }
    let game = GameSummary {
        rounds_played: 3,
        rounds_won: 3,
        best_score: 85,
        unique_words: 22,
        completed: true,
    };

    clock.set(at(5, 20));
    let unlocked = service.check_badges(&ama, &game).expect("check");
    let mut types: Vec<_> = unlocked.iter().map(|badge| badge.badge_type.as_str()).collect();
    types.sort_unstable();
    assert_eq!(
        types,
        vec!["creative", "first_win", "high_scorer", "perfect", "streak_master"]
    );
    assert!(unlocked.iter().all(|badge| badge.earned_at == at(5, 20)));

    let repeat = service.check_badges(&ama, &game).expect("check");
    assert!(repeat.is_empty());
}

#[test]
fn inconsistent_game_summary_is_rejected() {
    let (service, _, _) = build_service();
    let ama = user("ama");
    service.register_user(&ama).expect("register");
    let game = GameSummary {
        rounds_played: 2,
        rounds_won: 3,
        best_score: 50,
        unique_words: 4,
        completed: true,
    };

    assert!(matches!(
        service.check_badges(&ama, &game),
        Err(ProgressionServiceError::Engine(EngineError::Validation(_)))
    ));
}

#[test]
fn repository_outage_propagates() {
    let service = ProgressionService::new(Arc::new(UnavailableRepository));

    assert!(matches!(
        service.touch_streak(&user("ama")),
        Err(ProgressionServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}

#[test]
fn concurrent_activity_for_one_player_loses_no_updates() {
    let (service, repository, clock) = build_service();
    let esi = user("esi");
    clock.set(at(4, 12));

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..10 {
                    service.grant_xp(&esi, 10, "debate_round").expect("grant");
                }
            });
        }
    });

    let grants = repository.grants(&esi).expect("grants");
    assert_eq!(grants.len(), 80);
    assert_eq!(XpLedger::total(&grants), 800);
    assert_eq!(service.streak(&esi).expect("streak").current_streak, 1);
    assert_eq!(service.tracked_locks(), 0);
}
