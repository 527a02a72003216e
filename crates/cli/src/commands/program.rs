//! `athly program` — Generate a multi-week training program.

use athly_agent::Strategy;
use athly_core::capability::TableFormat;
use athly_core::program::ProgramRequest;
use clap::Args;

use super::session;

#[derive(Debug, Args)]
pub struct ProgramArgs {
    /// Discipline to train (repeat for several: --discipline running --discipline strength)
    #[arg(short, long = "discipline", required = true)]
    pub disciplines: Vec<String>,

    /// Program length in weeks (8 to 16)
    #[arg(long)]
    pub duration: u32,

    /// Athlete level (beginner, intermediate, advanced)
    #[arg(long)]
    pub level: String,

    /// What the program should achieve
    #[arg(long)]
    pub goals: String,

    /// Injuries, schedule or other constraints
    #[arg(long, default_value = "")]
    pub constraints: String,

    /// Available equipment
    #[arg(long, default_value = "")]
    pub equipment: String,

    /// Sessions per week
    #[arg(long)]
    pub frequency: u32,

    /// Minutes per session
    #[arg(long)]
    pub time_per_session: u32,

    /// Table format
    #[arg(long, default_value = "markdown", value_parser = ["markdown", "html"])]
    pub format: String,
}

impl ProgramArgs {
    pub fn into_request(self) -> ProgramRequest {
        ProgramRequest {
            disciplines: self.disciplines,
            duration: self.duration,
            level: self.level,
            goals: self.goals,
            constraints: self.constraints,
            equipment: self.equipment,
            frequency: self.frequency,
            time_per_session: self.time_per_session,
            format: TableFormat::from_hint(&self.format),
        }
    }
}

pub async fn run(args: ProgramArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.into_request();
    request.validate()?;

    let config = session::load_config()?;
    let orchestrator = session::build_orchestrator(&config)?;

    tracing::info!(
        strategy = Strategy::Pipeline.as_str(),
        disciplines = ?request.disciplines,
        weeks = request.duration,
        "Starting program generation"
    );
    eprintln!("  Generating a {}-week program, this can take a few minutes...", request.duration);

    let program = orchestrator.generate_training_program(&request).await?;
    println!("{program}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ProgramArgs,
    }

    fn parse(argv: &[&str]) -> Result<ProgramArgs, clap::Error> {
        TestCli::try_parse_from(std::iter::once("athly").chain(argv.iter().copied())).map(|c| c.args)
    }

    #[test]
    fn flags_build_a_request() {
        let args = parse(&[
            "--discipline", "running",
            "--discipline", "strength",
            "--duration", "12",
            "--level", "intermediate",
            "--goals", "semi-marathon",
            "--frequency", "4",
            "--time-per-session", "60",
            "--format", "html",
        ])
        .unwrap();
        let request = args.into_request();
        assert_eq!(request.disciplines, vec!["running", "strength"]);
        assert_eq!(request.format, TableFormat::Html);
        assert!(request.constraints.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn out_of_range_duration_fails_validation() {
        let request = parse(&[
            "-d", "running",
            "--duration", "20",
            "--level", "beginner",
            "--goals", "endurance",
            "--frequency", "3",
            "--time-per-session", "45",
        ])
        .unwrap()
        .into_request();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("between 8 and 16"));
    }

    #[test]
    fn discipline_is_required() {
        assert!(
            parse(&[
                "--duration", "8",
                "--level", "beginner",
                "--goals", "endurance",
                "--frequency", "3",
                "--time-per-session", "45",
            ])
            .is_err()
        );
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(
            parse(&[
                "-d", "running",
                "--duration", "8",
                "--level", "beginner",
                "--goals", "endurance",
                "--frequency", "3",
                "--time-per-session", "45",
                "--format", "xlsx",
            ])
            .is_err()
        );
    }
}
