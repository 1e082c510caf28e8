use anyhow::{Context, Result};
use asc_analytics_query::{
    AnalyticsRequest, AppId, AppListOptions, DimensionValuesOptions, Frequency, MetricsOptions, QueryBuilder,
    QuerySettings, SourcesOptions, TimeAgoFormat,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FrequencyArg {
    Days,
    Weekly,
    Monthly,
}

impl From<FrequencyArg> for Frequency {
    fn from(value: FrequencyArg) -> Self {
        match value {
            FrequencyArg::Days => Frequency::Days,
            FrequencyArg::Weekly => Frequency::Weekly,
            FrequencyArg::Monthly => Frequency::Monthly,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OperationArg {
    Metrics,
    AppList,
    DimensionValues,
    Sources,
}

#[derive(Parser)]
#[command(author, version, about = "Assemble App Store Connect analytics requests", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    ASC_ANALYTICS_API_URL  Override the analytics API base URL
    ASC_TIME_AGO_FORMAT    legacy|corrected start-time format for --ago
    RUST_LOG               Log filter (e.g. debug)

EXAMPLES:
    asc_query metrics --app-id 123 --options '{\"measures\":[\"units\"]}' --start 2024-01-01 --end 2024-01-31
    asc_query sources --app-id 123 --ago 7
    asc_query app-list --app-id 123 --options '{\"measures\":[\"units\"],\"adamId\":[\"123\",\"456\"]}'
    asc_query schema dimension-values")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Time-series report (/data/time-series)
    Metrics(RequestArgs),
    /// App list report (/data/app-list)
    AppList(RequestArgs),
    /// Dimension values report (/data/dimension-values)
    DimensionValues(RequestArgs),
    /// Sources list report (/data/sources/list)
    Sources(RequestArgs),
    /// Print the JSON schema of an operation's options
    Schema {
        #[arg(value_enum)]
        operation: OperationArg,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// App the request is built for
    #[arg(long)]
    app_id: String,

    /// Operation options as a JSON object with camelCase keys
    #[arg(short, long)]
    options: Option<String>,

    /// Report granularity
    #[arg(short, long, value_enum)]
    frequency: Option<FrequencyArg>,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,

    /// Last day of the range (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    end: Option<String>,

    /// Report on the last N units, ending today
    #[arg(long, conflicts_with = "start")]
    ago: Option<u32>,

    /// Unit for --ago
    #[arg(long, value_enum, default_value = "days")]
    ago_unit: FrequencyArg,

    /// Emit a well-formed start time for --ago instead of the legacy one
    #[arg(long)]
    corrected_time_ago: bool,
}

fn parse_options<T: DeserializeOwned + Default>(raw: Option<&str>) -> Result<T> {
    match raw {
        Some(raw) => serde_json::from_str(raw).context("Invalid --options JSON"),
        None => Ok(T::default()),
    }
}

/// Map parsed arguments onto a builder and finalize the request.
///
/// An explicit `--start` range wins over `--ago`; clap already rejects both together.
fn build_request(
    operation: OperationArg,
    args: RequestArgs,
    mut settings: QuerySettings,
) -> Result<AnalyticsRequest> {
    if args.corrected_time_ago {
        settings = settings.with_time_ago_format(TimeAgoFormat::Corrected);
    }

    let mut query = QueryBuilder::with_settings(AppId::parse(&args.app_id), settings);
    let raw = args.options.as_deref();
    match operation {
        OperationArg::Metrics => {
            query.metrics(parse_options::<MetricsOptions>(raw)?)?;
        }
        OperationArg::AppList => {
            query.app_list(parse_options::<AppListOptions>(raw)?)?;
        }
        OperationArg::DimensionValues => {
            query.dimension_values(parse_options::<DimensionValuesOptions>(raw)?)?;
        }
        OperationArg::Sources => {
            // No --options means no overrides, not an empty override set
            let options = match raw {
                Some(_) => Some(parse_options::<SourcesOptions>(raw)?),
                None => None,
            };
            query.sources(options);
        }
    }

    if let Some(frequency) = args.frequency {
        query.frequency(frequency.into());
    }
    if let Some(start) = args.start.as_deref() {
        query.date_range(start, args.end.as_deref())?;
    } else if let Some(ago) = args.ago {
        query.time_ago(ago, args.ago_unit.into())?;
    }

    Ok(query.build()?)
}

fn run_request(operation: OperationArg, args: RequestArgs) -> Result<()> {
    let request = build_request(operation, args, QuerySettings::from_env()?)?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

fn print_schema(operation: OperationArg) -> Result<()> {
    let schema = match operation {
        OperationArg::Metrics => schemars::schema_for!(MetricsOptions),
        OperationArg::AppList => schemars::schema_for!(AppListOptions),
        OperationArg::DimensionValues => schemars::schema_for!(DimensionValuesOptions),
        OperationArg::Sources => schemars::schema_for!(SourcesOptions),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match cli.command {
        Command::Metrics(args) => run_request(OperationArg::Metrics, args),
        Command::AppList(args) => run_request(OperationArg::AppList, args),
        Command::DimensionValues(args) => run_request(OperationArg::DimensionValues, args),
        Command::Sources(args) => run_request(OperationArg::Sources, args),
        Command::Schema { operation } => print_schema(operation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(argv: &[&str]) -> (OperationArg, RequestArgs) {
        let cli = Cli::try_parse_from(std::iter::once("asc_query").chain(argv.iter().copied()))
            .unwrap();
        match cli.command {
            Command::Metrics(args) => (OperationArg::Metrics, args),
            Command::AppList(args) => (OperationArg::AppList, args),
            Command::DimensionValues(args) => (OperationArg::DimensionValues, args),
            Command::Sources(args) => (OperationArg::Sources, args),
            Command::Schema { .. } => panic!("not a request command"),
        }
    }

    fn request(argv: &[&str]) -> AnalyticsRequest {
        let (operation, args) = parse(argv);
        build_request(operation, args, QuerySettings::default()).unwrap()
    }

    #[test]
    fn sources_without_options_uses_defaults() {
        let request = request(&["sources", "--app-id", "123"]);
        let payload = request.payload().unwrap();
        assert!(request.url.ends_with("/data/sources/list"));
        assert_eq!(payload["limit"], 200);
        assert_eq!(payload["dimension"], "domainReferer");
        assert_eq!(payload["adamId"], json!([123]));
    }

    #[test]
    fn sources_options_override_defaults() {
        let payload = request(&["sources", "--app-id", "123", "--options", r#"{"limit":50}"#])
            .payload()
            .unwrap();
        assert_eq!(payload["limit"], 50);
        assert_eq!(payload["dimension"], "domainReferer");
    }

    #[test]
    fn app_list_options_keep_numeric_ids() {
        let payload = request(&[
            "app-list",
            "--app-id",
            "1",
            "--options",
            r#"{"measures":["units"],"adamId":[123]}"#,
        ])
        .payload()
        .unwrap();
        assert_eq!(payload["adamId"], json!([123]));
    }

    #[test]
    fn start_and_end_set_the_range() {
        let payload = request(&[
            "metrics",
            "--app-id",
            "123",
            "--options",
            r#"{"measures":["units"]}"#,
            "--frequency",
            "monthly",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
        ])
        .payload()
        .unwrap();
        assert_eq!(payload["startTime"], "2024-01-01T00:00:000Z");
        assert_eq!(payload["endTime"], "2024-01-31T00:00:000Z");
        assert_eq!(payload["frequency"], "monthly");
    }

    #[test]
    fn ago_uses_requested_start_format() {
        let legacy = request(&["sources", "--app-id", "123", "--ago", "7"]);
        let legacy_start = legacy.payload().unwrap()["startTime"].as_str().unwrap().to_string();
        assert!(legacy_start.ends_with("%00:00:000Z"));

        let corrected = request(&[
            "sources",
            "--app-id",
            "123",
            "--ago",
            "1",
            "--ago-unit",
            "monthly",
            "--corrected-time-ago",
        ]);
        let corrected_start = corrected.payload().unwrap()["startTime"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(corrected_start.ends_with("T00:00:000Z"));
    }

    #[test]
    fn start_and_ago_conflict_on_the_command_line() {
        let result = Cli::try_parse_from([
            "asc_query", "sources", "--app-id", "123", "--start", "2024-01-01", "--ago", "7",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn explicit_start_wins_over_ago() {
        let (operation, mut args) = parse(&["sources", "--app-id", "123", "--start", "2024-01-01"]);
        args.ago = Some(7);
        let payload = build_request(operation, args, QuerySettings::default())
            .unwrap()
            .payload()
            .unwrap();
        assert_eq!(payload["startTime"], "2024-01-01T00:00:000Z");
        assert_eq!(payload["endTime"], "2024-01-01T00:01:000Z");
    }

    #[test]
    fn invalid_options_json_is_reported() {
        let (operation, args) = parse(&["metrics", "--app-id", "123", "--options", "{measures"]);
        let err = build_request(operation, args, QuerySettings::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid --options JSON"));
    }

    #[test]
    fn missing_required_option_surfaces_query_error() {
        let (operation, args) = parse(&["dimension-values", "--app-id", "123"]);
        let err = build_request(operation, args, QuerySettings::default()).unwrap_err();
        assert!(err.downcast_ref::<asc_analytics_query::QueryError>().is_some());
    }
}
