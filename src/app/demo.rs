//! `demo` and `status` subcommands

use std::error::Error;

use crate::app::cli::DemoArgs;
use crate::app::render::{self, DemoOutput, StatusOutput};
use crate::cleanup::api::{global_coordinator, CleanupConfig, CleanupCoordinator, CleanupReport};
use crate::core::styles::StyleRole;
use crate::host::{Workload, WorkloadOptions, WorkloadSummary};

impl From<&DemoArgs> for WorkloadOptions {
    fn from(args: &DemoArgs) -> Self {
        WorkloadOptions {
            scenes: args.scenes,
            children: args.children,
            depth: args.depth,
            fail_every: args.fail_every,
        }
    }
}

/// Build the workload, register it and run one cleanup pass.
///
/// Returns the pass report and the host-side summary afterwards.
pub async fn run_workload(
    options: WorkloadOptions,
    config: CleanupConfig,
) -> Result<(CleanupReport, WorkloadSummary), Box<dyn Error>> {
    options.validate()?;

    let workload = Workload::build(options);
    let coordinator = CleanupCoordinator::new()
        .with_host(workload.host_bindings())
        .with_config(config);
    workload.register_with(&coordinator)?;
    log::info!(
        "Registered {} handle(s)",
        coordinator.resource_stats().total()
    );

    let outcome = coordinator.cleanup().await;
    let report = outcome
        .report()
        .cloned()
        .ok_or("cleanup unexpectedly reported a pass already in progress")?;
    Ok((report, workload.summary()))
}

pub async fn demo(
    args: &DemoArgs,
    config: CleanupConfig,
    color: bool,
) -> Result<bool, Box<dyn Error>> {
    let (report, summary) = run_workload(WorkloadOptions::from(args), config).await?;

    if args.json {
        println!(
            "{}",
            render::to_json(&DemoOutput {
                report: &report,
                host: &summary,
            })?
        );
    } else {
        render::print_table(&render::phase_table(&report, color), color);
        println!();
        render::print_table(&render::status_table(&report.status, color), color);
        println!();
        render::print_table(&render::summary_table(&summary, color), color);
        println!(
            "{} {} ms",
            StyleRole::Header.paint("elapsed:", color),
            report.elapsed.as_millis()
        );
    }
    Ok(report.status.all_clean && report.aborted.is_none())
}

pub fn status(json: bool, color: bool) -> Result<bool, Box<dyn Error>> {
    let coordinator = global_coordinator();
    let status = coordinator.cleanup_status();
    let stats = coordinator.resource_stats();

    if json {
        println!(
            "{}",
            render::to_json(&StatusOutput {
                status: &status,
                stats: &stats,
            })?
        );
    } else {
        render::print_table(&render::status_table(&status, color), color);
        println!();
        render::print_table(&render::stats_table(&stats, color), color);
    }
    Ok(status.all_clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_workload_cleans_everything() {
        let (report, summary) = run_workload(WorkloadOptions::default(), CleanupConfig::immediate())
            .await
            .unwrap();

        assert!(report.status.all_clean);
        assert_eq!(summary.disposed, summary.disposables);
        assert_eq!(summary.listeners_attached, 0);
    }

    #[tokio::test]
    async fn test_run_workload_rejects_oversized_tree() {
        let options = WorkloadOptions {
            scenes: 1,
            children: 1000,
            depth: 3,
            fail_every: 0,
        };
        let err = run_workload(options, CleanupConfig::immediate())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exceed"));
    }

    #[test]
    fn test_options_from_args() {
        let args = DemoArgs {
            scenes: 5,
            children: 1,
            depth: 7,
            fail_every: 2,
            json: true,
        };
        assert_eq!(
            WorkloadOptions::from(&args),
            WorkloadOptions {
                scenes: 5,
                children: 1,
                depth: 7,
                fail_every: 2,
            }
        );
    }
}
