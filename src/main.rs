mod cli;

use std::io::Read;

use api_hunter::config::RuntimeConfig;
use api_hunter::param::{CommandParameter, ParameterDocument, PARAM_ANTI_BOT, PARAM_TARGET, PARAM_TASK_ID, PARAM_TESTS, PARAM_USER_AGENT};
use api_hunter::{analyzer, orchestrator, param, plan};
use cli::Commands;

fn init_logging(cli: &cli::Cli) {
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!("api_hunter={crate_level},reqwest=info,hyper=info,h2=info,lapin=info");
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_ansi(true).with_target(false).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::parse_cli();
    init_logging(&cli);

    let config = RuntimeConfig::from_env();

    let Some(command) = cli.command else {
        return Err(param::missing_subcommand_error().into());
    };

    match command {
        Commands::Test { target, tests, user_agent, anti_bot_detection, task_id } => {
            let mut params = vec![
                CommandParameter::new(PARAM_TARGET, vec![target]),
                CommandParameter::new(PARAM_TESTS, tests),
            ];
            if anti_bot_detection {
                params.push(CommandParameter::new(PARAM_ANTI_BOT, vec![]));
            }
            if let Some(ua) = user_agent {
                params.push(CommandParameter::new(PARAM_USER_AGENT, vec![ua]));
            }
            if let Some(id) = task_id {
                params.push(CommandParameter::new(PARAM_TASK_ID, vec![id]));
            }
            run_scan(params, &config).await?;
        }
        Commands::Json { path } => {
            let contents = std::fs::read_to_string(&path)?;
            let doc: ParameterDocument = serde_json::from_str(&contents)?;
            let params = param::params_from_document(doc)?;
            run_scan(params, &config).await?;
        }
        Commands::Rawjson => {
            let mut contents = String::new();
            std::io::stdin().read_to_string(&mut contents)?;
            let doc: ParameterDocument = serde_json::from_str(&contents)?;
            let params = param::params_from_document(doc)?;
            run_scan(params, &config).await?;
        }
        Commands::Help { names } => {
            let plan = plan::build_help_plan(&names, config.result_sink_url.is_some())?;
            orchestrator::run(plan, &config).await?;
        }
    }

    Ok(())
}

async fn run_scan(params: Vec<CommandParameter>, config: &RuntimeConfig) -> anyhow::Result<()> {
    let sink_configured = config.result_sink_url.is_some();
    let analyzer_ids = analyzer::analyzer_ids();
    param::validate(&params, sink_configured, &analyzer_ids)?;

    let plan = plan::build_scan_plan(&params, sink_configured)?;
    orchestrator::run(plan, config).await?;
    Ok(())
}
