//! CLI entrypoint for hive-consensus
//!
//! Wires the audit store, consensus engine, and vote collector together
//! using dependency injection, then either replays a scripted voting
//! scenario or dumps the recorded decision history.

mod scenario;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hive_application::{
    AuditStore, CollectionOptions, ConsensusEngine, SessionEvent, SessionObserver, VoteCollector,
    VoteWeightResolver,
};
use hive_domain::{AgentId, SwarmId};
use hive_infrastructure::{ConfigLoader, InMemoryAuditStore, JsonlAuditStore};

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "hive-consensus", version, about = "Swarm consensus engine with auditable quorum voting")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a config file (overrides global and project configs)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore global and project config files
    #[arg(long, global = true, conflicts_with = "config")]
    no_config: bool,

    /// Suppress event output, print only the decision
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a scripted voting round from a TOML scenario file
    Run {
        /// Scenario file describing the swarm, roster, and votes
        scenario: PathBuf,

        /// Append the audit trail to this JSONL file instead of memory
        #[arg(long)]
        audit_log: Option<PathBuf>,
    },
    /// Print recorded decisions for a swarm from a JSONL audit log
    History {
        /// Swarm to list decisions for
        #[arg(long)]
        swarm: String,

        /// Maximum number of decisions to print, newest first
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// JSONL audit log to read
        #[arg(long)]
        audit_log: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?
    };
    config.validate()?;

    match cli.command {
        Command::Run { scenario, audit_log } => {
            let scenario = Scenario::load(&scenario)?;
            let audit_log = audit_log.or_else(|| config.audit.log_path.clone());
            run_scenario(scenario, audit_log, config.progress_interval(), cli.quiet).await
        }
        Command::History { swarm, limit, audit_log } => {
            let path = audit_log
                .or_else(|| config.audit.log_path.clone())
                .context("no audit log configured; pass --audit-log or set audit.log_path")?;
            print_history(&path, &swarm, limit).await
        }
    }
}

async fn run_scenario(
    scenario: Scenario,
    audit_log: Option<PathBuf>,
    progress_interval: Duration,
    quiet: bool,
) -> Result<()> {
    info!(swarm = %scenario.swarm_id, proposal = %scenario.proposal_id, "starting scenario");

    // === Dependency Injection ===
    let store: Arc<dyn AuditStore> = match &audit_log {
        Some(path) => Arc::new(JsonlAuditStore::open(path)?),
        None => Arc::new(InMemoryAuditStore::new()),
    };

    let engine = ConsensusEngine::new(Arc::clone(&store));
    let mut collector = VoteCollector::new(engine.clone());
    if !quiet {
        collector = collector.with_observer(Arc::new(ConsoleObserver));
    }
    if scenario.has_weights() {
        collector = collector
            .with_weight_resolver(Arc::new(ScenarioWeights(scenario.weights())));
    }

    let mut options = CollectionOptions::default()
        .with_algorithm(scenario.algorithm)
        .with_timeout(scenario.timeout())
        .with_progress_interval(progress_interval);
    if scenario.has_weights() {
        options = options.with_auto_weighting();
    }
    if let Some(description) = &scenario.description {
        options = options.with_description(description.clone());
    }

    if !quiet {
        println!();
        println!("+============================================================+");
        println!("|           Hive Consensus - Voting Round                    |");
        println!("+============================================================+");
        println!();
        println!("Swarm:     {}", scenario.swarm_id);
        println!("Proposal:  {}", scenario.proposal_id);
        println!("Algorithm: {}", scenario.algorithm);
        println!("Roster:    {}", scenario.roster.join(", "));
        println!();
    }

    let roster: Vec<AgentId> = scenario.roster.iter().map(AgentId::new).collect();
    collector
        .start_collection(
            scenario.swarm_id.as_str(),
            scenario.proposal_id.clone(),
            roster,
            options,
        )
        .await?;

    for vote in &scenario.votes {
        let value = vote.vote_value()?;
        collector
            .submit_vote(
                &scenario.proposal_id,
                vote.agent.as_str(),
                value,
                vote.justification.clone(),
            )
            .await
            .with_context(|| format!("vote by {} failed", vote.agent))?;
    }

    // With partial roster coverage the round runs its voting window out;
    // wait for the session to finalize and disappear.
    while collector.get_status(&scenario.proposal_id).await.is_ok() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let swarm_id = SwarmId::new(scenario.swarm_id.as_str());
    let decisions = engine.get_decision_history(&swarm_id, 1).await?;
    let decision = decisions
        .first()
        .context("round produced no recorded decision")?;

    let outcome = decision
        .outcome
        .map(|o| o.to_string())
        .unwrap_or_else(|| "no quorum".to_string());
    println!();
    println!("Decision:   {}", outcome);
    println!("Confidence: {:.2}", decision.confidence);
    println!("Algorithm:  {}", decision.algorithm);
    println!("Votes:      {}", decision.votes.len());

    collector.shutdown();
    Ok(())
}

async fn print_history(path: &std::path::Path, swarm: &str, limit: usize) -> Result<()> {
    let store = JsonlAuditStore::open(path)?;
    let decisions = store.decision_history(&SwarmId::new(swarm), limit).await?;

    if decisions.is_empty() {
        println!("No decisions recorded for swarm {}", swarm);
        return Ok(());
    }

    for decision in &decisions {
        let outcome = decision
            .outcome
            .map(|o| o.to_string())
            .unwrap_or_else(|| "no quorum".to_string());
        println!(
            "[{}] {} - {} ({}, confidence {:.2}, {} votes)",
            decision.created_at.format("%Y-%m-%d %H:%M:%S"),
            decision.proposal_id,
            outcome,
            decision.algorithm,
            decision.confidence,
            decision.votes.len(),
        );
        if let Some(topic) = &decision.topic {
            println!("    topic: {}", topic);
        }
    }

    Ok(())
}

/// Prints session lifecycle events to stdout as they happen.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::VoteReceived {
                agent_id,
                vote,
                weight,
                votes_received,
                total_agents,
                ..
            } => {
                println!(
                    "  vote: {} -> {:.2} (weight {:.1}) [{}/{}]",
                    agent_id, vote, weight, votes_received, total_agents
                );
            }
            SessionEvent::Progress {
                votes_received,
                total_agents,
                time_remaining,
                ..
            } => {
                println!(
                    "  progress: {}/{} votes, {:.1}s remaining",
                    votes_received,
                    total_agents,
                    time_remaining.as_secs_f64()
                );
            }
            SessionEvent::Completed {
                outcome,
                confidence,
                votes_received,
                total_agents,
                ..
            } => {
                let outcome = outcome
                    .map(|o| o.to_string())
                    .unwrap_or_else(|| "no quorum".to_string());
                println!(
                    "  completed: {} (confidence {:.2}, {}/{} votes)",
                    outcome, confidence, votes_received, total_agents
                );
            }
            SessionEvent::Error { error, .. } => {
                println!("  error: {}", error);
            }
            SessionEvent::Cancelled { proposal_id } => {
                println!("  cancelled: {}", proposal_id);
            }
        }
    }
}

/// Resolves voter weights from the scenario's scripted weights. Agents
/// without a declared weight count as 1.0.
struct ScenarioWeights(std::collections::HashMap<String, f64>);

#[async_trait::async_trait]
impl VoteWeightResolver for ScenarioWeights {
    async fn resolve(&self, _swarm_id: &SwarmId, agent_id: &AgentId) -> f64 {
        self.0.get(agent_id.as_str()).copied().unwrap_or(1.0)
    }
}
