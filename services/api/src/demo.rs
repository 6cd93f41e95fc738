use crate::infra::{parse_date, parse_weights, InMemoryResponseRepository};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use party_scheduler::error::AppError;
use party_scheduler::workflows::scheduling::{
    Announcement, CsvResponseStore, RawSubmission, ResponseRepository, RoleWeights, ScheduleSetup,
    SchedulingService, ScoreResult,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreReportArgs {
    /// Directory holding response_<n>.csv files
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// First candidate date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: NaiveDate,
    /// Last candidate date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) end: NaiveDate,
    /// Role weights as role=weight pairs, e.g. staff=1,manager=3
    #[arg(long, value_parser = parse_weights)]
    pub(crate) weights: Option<RoleWeights>,
    /// Skip printing the announcement draft
    #[arg(long)]
    pub(crate) skip_announcement: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// First candidate date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Skip printing the announcement draft
    #[arg(long)]
    pub(crate) skip_announcement: bool,
}

pub(crate) fn run_score_report(args: ScoreReportArgs) -> Result<(), AppError> {
    let ScoreReportArgs {
        responses,
        start,
        end,
        weights,
        skip_announcement,
    } = args;

    let store = Arc::new(CsvResponseStore::open(&responses)?);
    let setup = ScheduleSetup::new(start, end, end, "")?;
    let service = SchedulingService::new(
        setup,
        store,
        weights.unwrap_or_else(RoleWeights::standard),
    );

    println!("Party date scores");
    println!("Responses: {}", responses.display());
    let result = service.score()?;
    render_result(&result, skip_announcement);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        start,
        skip_announcement,
    } = args;

    let start = start.unwrap_or_else(|| Local::now().date_naive());
    let mut setup = ScheduleSetup::opening_on(start);
    setup.comment = "Izakaya near the station, 19:00".to_string();

    println!("Party date poll demo");
    println!(
        "Candidate dates: {} -> {} | answers due {}",
        setup.dates.first(),
        setup.dates.last(),
        setup.deadline
    );
    println!("Note: {}", setup.comment);

    let repository = Arc::new(InMemoryResponseRepository::default());
    let service = SchedulingService::new(setup, repository.clone(), RoleWeights::standard());

    println!("\nSubmissions");
    for submission in demo_submissions(start) {
        match service.submit(submission) {
            Ok(receipt) => {
                println!(
                    "- #{} {} accepted",
                    receipt.sequence,
                    receipt.role.localized_label()
                );
                for warning in &receipt.warnings {
                    println!("    warning: {warning}");
                }
            }
            Err(err) => println!("- rejected: {err}"),
        }
    }

    let stored = repository.list_all()?;
    println!("Stored responses: {}", stored.len());

    let result = service.score()?;
    render_result(&result, skip_announcement);

    Ok(())
}

fn demo_submissions(start: NaiveDate) -> Vec<RawSubmission> {
    let on = |offset: i64| (start + Duration::days(offset)).format("%Y-%m-%d").to_string();
    let submission = |role: &str, answers: Vec<(String, &str)>| RawSubmission {
        role: role.to_string(),
        answers: answers
            .into_iter()
            .map(|(date, level)| (date, level.to_string()))
            .collect::<BTreeMap<_, _>>(),
    };

    vec![
        submission(
            "staff",
            vec![(on(1), "definitely_can"), (on(2), "probably_can")],
        ),
        submission(
            "リーダークラス",
            vec![(on(1), "たぶん行ける"), (on(3), "絶対行ける")],
        ),
        submission(
            "manager",
            vec![(on(2), "definitely_can"), (on(3), "probably_can")],
        ),
        submission(
            "executive",
            vec![
                (on(2), "definitely_can"),
                (on(3), "probably_can"),
                (on(30), "definitely_can"),
            ],
        ),
        submission("intern", vec![(on(1), "definitely_can")]),
    ]
}

fn render_result(result: &ScoreResult, skip_announcement: bool) {
    println!("\nRanking ({} responses)", result.response_count);
    for entry in result.ranking() {
        let marker = if entry.date == result.best_date {
            " <- selected"
        } else {
            ""
        };
        println!(
            "- {}: {}{}",
            entry.date.format("%Y-%m-%d (%a)"),
            entry.score,
            marker
        );
    }

    if skip_announcement {
        return;
    }

    let announcement = Announcement::for_result(result);
    println!("\nAnnouncement draft\n{}", announcement.render());
}
