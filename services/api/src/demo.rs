use crate::infra::{default_game_service, parse_date, InMemoryProgressionRepository};
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use persuasion_game::config::EngineConfig;
use persuasion_game::error::AppError;
use persuasion_game::game::{
    unique_words, Argument, Evaluation, Stance, StanceMachine, TonalStyle, TranscriptImporter,
};
use persuasion_game::progression::{FixedClock, GameSummary, ProgressionService, UserId};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Argument text to score
    pub(crate) argument: String,
    /// Declared tone (polite, passionate, formal, casual, confrontational)
    #[arg(long)]
    pub(crate) tone: Option<String>,
    /// Optional debate topic used for relevance scoring
    #[arg(long)]
    pub(crate) topic: Option<String>,
    /// Opponent stance before this argument
    #[arg(long, default_value = "disagree")]
    pub(crate) stance: String,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV transcript with argument,tone,topic columns
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Player nickname used for progression records
    #[arg(long, default_value = "Ama")]
    pub(crate) player: String,
    /// Override the game date (YYYY-MM-DD). Defaults to the current UTC day.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

const DEMO_SCENARIO: &str = "Convince the market trader to lower the price of kente cloth";

const DEMO_ROUNDS: [(&str, TonalStyle); 3] = [
    (
        "Maybe you could lower it a bit, I think?",
        TonalStyle::Casual,
    ),
    (
        "Please consider that I buy from your stall every week and I always recommend you to my friends.",
        TonalStyle::Polite,
    ),
    (
        "Because I am a loyal customer who brings you new buyers, research indicates that \
         repeat customers are the best investment, therefore a fair discount benefits us both.",
        TonalStyle::Passionate,
    ),
];

fn print_evaluation(evaluation: &Evaluation) {
    let verdict = if evaluation.persuaded {
        "persuaded"
    } else {
        "not persuaded"
    };
    println!("- score {} / 100 ({verdict})", evaluation.score);
    for component in &evaluation.components {
        println!(
            "  - {:?}: {:+.1} ({})",
            component.factor, component.points, component.notes
        );
    }
    if evaluation.sentiment_degraded {
        println!("  - sentiment unavailable; scored without it");
    }
    println!("- feedback: {}", evaluation.feedback_text());
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        argument,
        tone,
        topic,
        stance,
    } = args;

    let current: Stance = stance.parse()?;
    let mut argument = Argument::new(
        argument,
        tone.as_deref()
            .map(TonalStyle::parse_lenient)
            .unwrap_or_default(),
    );
    argument.topic = topic;

    let service = default_game_service(EngineConfig::default());
    let evaluation = service.evaluate(&argument)?;
    let transition = StanceMachine::transition(current, evaluation.score)?;

    println!("Argument evaluation");
    print_evaluation(&evaluation);
    println!(
        "- opponent: {} -> {} ({})",
        transition.previous, transition.next, transition.reasoning
    );
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let arguments = TranscriptImporter::from_path(&args.csv)?;
    let service = default_game_service(EngineConfig::default());

    println!("Transcript: {} ({} arguments)", args.csv.display(), arguments.len());
    let mut scored = Vec::new();
    for (index, (argument, result)) in arguments
        .iter()
        .zip(service.evaluate_batch(&arguments))
        .enumerate()
    {
        match result {
            Ok(evaluation) => {
                println!(
                    "{:>3}. [{:>3}] {:<13} {}",
                    index + 1,
                    evaluation.score,
                    if evaluation.persuaded { "persuaded" } else { "unconvinced" },
                    argument.text
                );
                scored.push(evaluation);
            }
            Err(err) => println!("{:>3}. [err] {err}", index + 1),
        }
    }

    if !scored.is_empty() {
        let persuaded = scored.iter().filter(|evaluation| evaluation.persuaded).count();
        let average = scored
            .iter()
            .map(|evaluation| f64::from(evaluation.score))
            .sum::<f64>()
            / scored.len() as f64;
        println!(
            "Summary: {persuaded}/{} persuaded | average score {average:.1}",
            scored.len()
        );
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { player, today } = args;
    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let player = UserId::parse(&player)?;

    let started_at = Utc.from_utc_datetime(&today.and_time(NaiveTime::default()));
    let clock = Arc::new(FixedClock::new(started_at));
    let game = default_game_service(EngineConfig::default());
    let progression = ProgressionService::new(Arc::new(InMemoryProgressionRepository::default()))
        .with_clock(clock.clone());
    progression.register_user(&player)?;

    println!("Persuasion game demo");
    println!("Scenario: {DEMO_SCENARIO}");

    let mut stance = Stance::Disagree;
    let mut vocabulary = BTreeSet::new();
    let mut summary = GameSummary {
        completed: true,
        ..GameSummary::default()
    };

    for (round, (text, tone)) in DEMO_ROUNDS.iter().enumerate() {
        let argument = Argument::new(*text, *tone);
        let turn = game.advance_dialogue(DEMO_SCENARIO, &argument, stance)?;
        vocabulary.extend(unique_words(text));

        summary.rounds_played += 1;
        if turn.persuaded {
            summary.rounds_won += 1;
        }
        summary.best_score = summary.best_score.max(turn.score);

        let played_at = started_at
            .checked_add_signed(Duration::minutes(5 * (round as i64 + 1)))
            .unwrap_or(started_at);
        clock.set(played_at);
        let award = progression.grant_xp(&player, u32::from(turn.score), "debate_round")?;

        println!("\nRound {} ({})", round + 1, tone.label());
        println!("Player: {text}");
        println!("Opponent: {}", turn.ai_response);
        println!(
            "- score {} | stance {} -> {} | +{} XP (x{:.2})",
            turn.score,
            turn.previous_stance,
            turn.new_stance,
            award.grant.final_amount,
            award.xp_multiplier
        );
        stance = turn.new_stance;
    }

    summary.unique_words = u32::try_from(vocabulary.len()).unwrap_or(u32::MAX);
    let unlocked = progression.check_badges(&player, &summary)?;
    let level = progression.level(&player)?;
    let streak = progression.streak(&player)?;

    println!("\nResult");
    println!(
        "- rounds won {}/{} | best score {} | {} unique words",
        summary.rounds_won, summary.rounds_played, summary.best_score, summary.unique_words
    );
    println!(
        "- level {} | {} XP (next level at {})",
        level.level, level.total_xp, level.next_level_at
    );
    println!(
        "- streak {} day(s) | next activity due {}",
        streak.current_streak,
        streak
            .next_activity_due
            .map_or_else(|| "-".to_string(), |due| due.to_string())
    );
    if unlocked.is_empty() {
        println!("- no new badges");
    }
    for badge in unlocked {
        println!("- badge unlocked: {} ({})", badge.name, badge.description);
    }
    Ok(())
}
