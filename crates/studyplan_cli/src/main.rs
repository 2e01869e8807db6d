//! Terminal front end for the study plan core.
//!
//! # Responsibility
//! - Map subcommands onto the plan service (add, list, show, delete).
//! - Render summaries and flowcharts as plain text.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studyplan_core::db::open_db;
use studyplan_core::{
    init_logging_from_config, AppConfig, Flowchart, FlowchartNode, PlanInput, PlanService,
    PlanStore, PlanSummary, SqliteStorage, SystemClock,
};

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Track exam study plans")]
struct Cli {
    /// Plan database path (overrides STUDYPLAN_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a new plan and print its flowchart
    Add {
        /// Exam name
        #[arg(long)]
        name: String,
        /// Exam date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Comma-separated study topics
        #[arg(long)]
        topics: String,
        /// Comma-separated sub-topics
        #[arg(long, default_value = "")]
        sub_topics: String,
        /// Topic hours per entry
        #[arg(long)]
        topic_hours: Option<String>,
        /// Topic minutes per entry
        #[arg(long)]
        topic_minutes: Option<String>,
        /// Sub-topic hours per entry
        #[arg(long)]
        sub_topic_hours: Option<String>,
        /// Sub-topic minutes per entry
        #[arg(long)]
        sub_topic_minutes: Option<String>,
    },
    /// List saved plans, newest first
    List,
    /// Print the flowchart of a saved plan
    Show {
        /// Plan ID
        id: i64,
    },
    /// Delete a saved plan
    Delete {
        /// Plan ID
        id: i64,
    },
    /// Print core linkage and storage info
    Ping,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let service = PlanService::new(PlanStore::new(SqliteStorage::new(&conn)), SystemClock);

    match cli.command {
        Commands::Add {
            name,
            date,
            topics,
            sub_topics,
            topic_hours,
            topic_minutes,
            sub_topic_hours,
            sub_topic_minutes,
        } => {
            let input = PlanInput {
                exam_name: name,
                exam_date: date,
                study_topics: topics,
                sub_topics,
                topic_hours,
                topic_minutes,
                sub_topic_hours,
                sub_topic_minutes,
            };
            let submitted = service.submit(&input)?;
            println!("Saved plan {}", submitted.plan.id);
            print!("{}", render_flowchart(&submitted.flowchart));
        }
        Commands::List => {
            let summaries = service.list_summaries();
            if summaries.is_empty() {
                println!("No previous plans found.");
            }
            for summary in &summaries {
                print!("{}", render_summary(summary));
            }
        }
        Commands::Show { id } => match service.view(id) {
            Some(flowchart) => print!("{}", render_flowchart(&flowchart)),
            None => bail!("plan not found: {id}"),
        },
        Commands::Delete { id } => {
            let remaining = service.delete(id)?;
            println!("{} plan(s) remaining", remaining.len());
        }
        Commands::Ping => {
            println!("studyplan_core ping={}", studyplan_core::ping());
            println!("studyplan_core version={}", studyplan_core::core_version());
            println!("db_path={}", config.db_path.display());
        }
    }

    Ok(())
}

fn render_summary(summary: &PlanSummary) -> String {
    format!(
        "[{}] {}\n    Date: {} ({} days left)\n    Topics: {}\n",
        summary.id,
        summary.exam_name,
        summary.exam_date,
        summary.remaining_days,
        summary.topics_label
    )
}

fn render_flowchart(flowchart: &Flowchart) -> String {
    let mut out = String::new();
    let mut section = "";
    for node in &flowchart.nodes {
        let heading = match node {
            FlowchartNode::Topic { .. } => "Topics",
            FlowchartNode::Subtopic { .. } => "Sub-topics",
            _ => "",
        };
        if !heading.is_empty() && heading != section {
            out.push_str(&format!("  {heading}\n"));
        }
        section = heading;

        match node {
            FlowchartNode::Start => out.push_str("(Start)\n"),
            FlowchartNode::End => out.push_str("(End)\n"),
            FlowchartNode::Exam {
                exam_name,
                exam_date,
                remaining_days,
            } => out.push_str(&format!(
                "[{exam_name}] Date: {exam_date} ({remaining_days} days to go!)\n"
            )),
            FlowchartNode::Topic {
                label,
                duration_label,
            }
            | FlowchartNode::Subtopic {
                label,
                duration_label,
            } => match duration_label {
                Some(duration) => out.push_str(&format!("    - {label} ({duration})\n")),
                None => out.push_str(&format!("    - {label}\n")),
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{render_flowchart, Cli, Commands};
    use clap::Parser;
    use studyplan_core::{build_flowchart, Clock, StudyDuration, StudyPlan, SystemClock};

    #[test]
    fn add_command_parses_optional_durations() {
        let cli = Cli::try_parse_from([
            "studyplan",
            "add",
            "--name",
            "Math",
            "--date",
            "2099-01-01",
            "--topics",
            "A,B",
            "--topic-hours",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                topic_hours,
                topic_minutes,
                sub_topics,
                ..
            } => {
                assert_eq!(topic_hours.as_deref(), Some("2"));
                assert_eq!(topic_minutes, None);
                assert_eq!(sub_topics, "");
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn render_flowchart_groups_topic_sections() {
        let plan = StudyPlan {
            id: 1,
            exam_name: "Math".to_string(),
            exam_date: "2000-01-01".to_string(),
            study_topics: vec!["A".to_string(), "B".to_string()],
            sub_topics: vec!["a1".to_string()],
            time_per_topic: StudyDuration::new(0, 45),
            time_per_sub_topic: StudyDuration::default(),
        };
        let rendered = render_flowchart(&build_flowchart(&plan, SystemClock.now()));

        assert_eq!(
            rendered,
            "(Start)\n[Math] Date: 2000-01-01 (0 days to go!)\n  Topics\n    - A (45m)\n    - B (45m)\n  Sub-topics\n    - a1\n(End)\n"
        );
    }
}
