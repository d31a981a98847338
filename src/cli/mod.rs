use std::path::PathBuf;

use anyhow::Context;
use calheat::services::calendar::Zone;
use calheat::services::range::PaddedRange;
use calheat::services::scale::ColorScale;
use calheat::types::{DateLike, DayValue, HeatmapOptions};
use calheat::Heatmap;
use clap::{Args, Parser, Subcommand};

/// Calendar heatmap layout engine
#[derive(Parser)]
#[command(name = "calheat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved and padded date range
    Range {
        #[command(flatten)]
        args: LayoutArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the computed layout as JSON
    Layout {
        #[command(flatten)]
        args: LayoutArgs,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Interactive terminal preview
    Preview {
        #[command(flatten)]
        args: LayoutArgs,
    },
}

/// Inputs shared by every subcommand; flags override the config file
#[derive(Args, Debug, Default)]
struct LayoutArgs {
    /// JSON array of { "date": ..., "count": ... }
    #[arg(long)]
    values: Option<PathBuf>,

    /// JSON heatmap options
    #[arg(long)]
    config: Option<PathBuf>,

    /// First day (date string or epoch millis)
    #[arg(long)]
    start: Option<String>,

    /// Last day (date string or epoch millis), defaults to today
    #[arg(long)]
    end: Option<String>,

    /// Range length in days (deprecated, prefer --start)
    #[arg(long)]
    num_days: Option<u32>,

    /// Space between squares
    #[arg(long)]
    gutter: Option<f64>,

    /// Weeks as rows instead of columns
    #[arg(long)]
    vertical: bool,

    /// First day of the week (0 = Sunday)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=6))]
    week_start: Option<u32>,

    #[arg(long)]
    weekday_labels: bool,

    #[arg(long)]
    no_month_labels: bool,

    /// Draw padding days before and after the range
    #[arg(long)]
    out_of_range: bool,

    /// Use UTC days instead of the local timezone
    #[arg(long)]
    utc: bool,
}

/// Integer arguments are epoch millis, anything else is date text
fn date_arg(text: &str) -> DateLike {
    match text.parse::<i64>() {
        Ok(millis) => DateLike::Millis(millis),
        Err(_) => text.into(),
    }
}

impl LayoutArgs {
    fn options(&self) -> anyhow::Result<HeatmapOptions> {
        let mut options = match &self.config {
            Some(path) => HeatmapOptions::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => HeatmapOptions::default(),
        };

        if let Some(start) = &self.start {
            options.start_date = Some(date_arg(start));
        }
        if let Some(end) = &self.end {
            options.end_date = Some(date_arg(end));
        }
        if let Some(n) = self.num_days {
            options.num_days = Some(n);
        }
        if let Some(gutter) = self.gutter {
            options.gutter_size = gutter;
        }
        if let Some(day) = self.week_start {
            options.week_start_day = day;
        }
        if self.vertical {
            options.horizontal = false;
        }
        if self.weekday_labels {
            options.show_weekday_labels = true;
        }
        if self.no_month_labels {
            options.show_month_labels = false;
        }
        if self.out_of_range {
            options.show_out_of_range_days = true;
        }
        if self.utc {
            options.zone = Zone::Utc;
        }

        options.validate()?;
        Ok(options)
    }

    fn heatmap(&self) -> anyhow::Result<Heatmap<DayValue>> {
        let options = self.options()?;
        let values = match &self.values {
            Some(path) => DayValue::load_json_file(path)
                .with_context(|| format!("failed to load values {}", path.display()))?,
            None => Vec::new(),
        };
        log::debug!("loaded {} values", values.len());

        let scale = ColorScale::from_values(&values);
        Ok(Heatmap::new(options)
            .with_values(values)
            .with_class_for_value(move |v| scale.class_for(v))
            .with_title_for_value(|v| v.map(|v| format!("{}: {}", v.date, v.count_or_zero()))))
    }
}

fn format_range(range: &PaddedRange) -> String {
    format!(
        "Range:   {} → {} ({} days)\nPadded:  {} → {} ({} weeks)\nSource:  {:?}",
        range.start.format("%Y-%m-%d"),
        range.end.format("%Y-%m-%d"),
        range.day_count,
        range.padded_start.format("%Y-%m-%d"),
        range.padded_end.format("%Y-%m-%d"),
        range.week_count(),
        range.source,
    )
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        calheat::logging::init(self.verbose)?;

        match self.command {
            Commands::Range { args, json } => {
                let range = args.heatmap()?.range()?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&range)?);
                } else {
                    println!("{}", format_range(&range));
                }
                Ok(())
            }
            Commands::Layout { args, compact } => {
                let heatmap = args.heatmap()?;
                let layout = heatmap.layout()?;
                log::debug!(
                    "{} weeks, {} filled squares",
                    layout.weeks.len(),
                    layout.filled_count()
                );
                let out = if compact {
                    serde_json::to_string(&layout)?
                } else {
                    serde_json::to_string_pretty(&layout)?
                };
                println!("{}", out);
                Ok(())
            }
            Commands::Preview { args } => calheat::tui::run(args.heatmap()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calheat::services::range::RangeSource;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn layout_args(cli: Cli) -> LayoutArgs {
        match cli.command {
            Commands::Range { args, .. }
            | Commands::Layout { args, .. }
            | Commands::Preview { args } => args,
        }
    }

    // ========== Parsing tests ==========

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["calheat"]).is_err());
    }

    #[test]
    fn test_cli_parse_range_json() {
        let cli = Cli::try_parse_from(["calheat", "range", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Range { json: true, .. }));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_layout_flags() {
        let cli = Cli::try_parse_from([
            "calheat",
            "-v",
            "layout",
            "--compact",
            "--start",
            "2022-11-01",
            "--end",
            "2022-11-30",
            "--vertical",
            "--week-start",
            "1",
            "--gutter",
            "2",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Layout { compact: true, .. }));

        let args = layout_args(cli);
        assert_eq!(args.start.as_deref(), Some("2022-11-01"));
        assert!(args.vertical);
        assert_eq!(args.week_start, Some(1));
        assert_eq!(args.gutter, Some(2.0));
    }

    #[test]
    fn test_cli_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["calheat", "preview", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Preview { .. }));
    }

    #[test]
    fn test_cli_rejects_week_start_out_of_range() {
        assert!(Cli::try_parse_from(["calheat", "range", "--week-start", "7"]).is_err());
    }

    // ========== Options tests ==========

    #[test]
    fn test_options_flags_override_defaults() {
        let args = LayoutArgs {
            start: Some("2022-11-01".into()),
            num_days: Some(10),
            vertical: true,
            weekday_labels: true,
            no_month_labels: true,
            out_of_range: true,
            utc: true,
            ..LayoutArgs::default()
        };
        let options = args.options().unwrap();
        assert!(!options.horizontal);
        assert!(options.show_weekday_labels);
        assert!(!options.show_month_labels);
        assert!(options.show_out_of_range_days);
        assert_eq!(options.zone, Zone::Utc);
        assert_eq!(options.num_days, Some(10));
        assert_eq!(options.start_date, Some("2022-11-01".into()));
    }

    #[test]
    fn test_date_arg_forms() {
        assert_eq!(date_arg("1667260800000"), DateLike::Millis(1_667_260_800_000));
        assert_eq!(date_arg("-86400000"), DateLike::Millis(-86_400_000));
        assert_eq!(date_arg("2022-11-01"), DateLike::Text("2022-11-01".into()));
    }

    #[test]
    fn test_millis_start_resolves() {
        let cli = Cli::try_parse_from([
            "calheat",
            "range",
            "--start",
            "1667260800000", // 2022-11-01T00:00:00Z
            "--end",
            "2022-11-30",
            "--utc",
        ])
        .unwrap();
        let args = layout_args(cli);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let range = args.heatmap().unwrap().range_at(now).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2022, 11, 1).unwrap());
        assert_eq!(range.day_count, 30);
        assert_eq!(range.source, RangeSource::StartDate);
    }

    #[test]
    fn test_options_from_config_file() {
        let args = LayoutArgs {
            config: Some(fixture("options.json")),
            ..LayoutArgs::default()
        };
        let options = args.options().unwrap();
        assert_eq!(options.week_start_day, 1);
        assert!(options.show_weekday_labels);
        assert_eq!(options.zone, Zone::Utc);
    }

    #[test]
    fn test_options_flag_beats_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"gutterSize": 3, "horizontal": true}}"#).unwrap();

        let args = LayoutArgs {
            config: Some(file.path().to_path_buf()),
            gutter: Some(0.5),
            vertical: true,
            ..LayoutArgs::default()
        };
        let options = args.options().unwrap();
        assert_eq!(options.gutter_size, 0.5);
        assert!(!options.horizontal);
    }

    #[test]
    fn test_options_invalid_gutter() {
        let args = LayoutArgs {
            gutter: Some(-1.0),
            ..LayoutArgs::default()
        };
        let err = args.options().unwrap_err();
        assert!(err.to_string().contains("gutterSize"));
    }

    #[test]
    fn test_options_missing_config() {
        let args = LayoutArgs {
            config: Some(PathBuf::from("/nonexistent/calheat.json")),
            ..LayoutArgs::default()
        };
        let err = args.options().unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }

    // ========== Heatmap tests ==========

    #[test]
    fn test_heatmap_from_fixture() {
        let args = LayoutArgs {
            values: Some(fixture("values.json")),
            start: Some("2022-11-01".into()),
            end: Some("2022-11-30".into()),
            utc: true,
            ..LayoutArgs::default()
        };
        let heatmap = args.heatmap().unwrap();
        assert_eq!(heatmap.values().len(), 6);

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let layout = heatmap.layout_at(now).unwrap();
        // one fixture value falls in December
        assert_eq!(layout.filled_count(), 5);

        let first = layout.square_for_index(2).unwrap();
        assert_eq!(first.title.as_deref(), Some("2022-11-01: 3"));
        assert!(first.class_name.starts_with("color-scale-"));

        let empty = layout.square_for_index(3).unwrap();
        assert_eq!(empty.class_name, "color-empty");
        assert_eq!(empty.title, None);
    }

    #[test]
    fn test_heatmap_without_values() {
        let args = LayoutArgs {
            num_days: Some(7),
            ..LayoutArgs::default()
        };
        let heatmap = args.heatmap().unwrap();
        assert!(heatmap.values().is_empty());
    }

    // ========== Output tests ==========

    #[test]
    fn test_format_range() {
        let args = LayoutArgs {
            start: Some("2022-11-01".into()),
            end: Some("2022-11-30".into()),
            utc: true,
            ..LayoutArgs::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let range = args.heatmap().unwrap().range_at(now).unwrap();
        assert_eq!(range.padded_start, NaiveDate::from_ymd_opt(2022, 10, 30).unwrap());
        assert_eq!(range.source, RangeSource::StartDate);

        let text = format_range(&range);
        assert_eq!(
            text,
            "Range:   2022-11-01 → 2022-11-30 (30 days)\n\
             Padded:  2022-10-30 → 2022-12-03 (5 weeks)\n\
             Source:  StartDate"
        );
    }
}
