use std::env;
use std::error::Error;
use std::time::Duration;

use chrono::Local;
use netwait::{AppConfig, FaultKind, LossStats, PingGroups, PingRunner, Prober, WaitOpts, wait_for};

const PROBE_TIMEOUT_SECS: u64 = 5;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = AppConfig::load();
    let target = env::args().nth(1).unwrap_or_else(|| config.target.clone());

    let mut prober = Prober::new(Duration::from_secs(PROBE_TIMEOUT_SECS))?;
    let opts = WaitOpts::new(
        Duration::from_secs(config.timeout_secs),
        Duration::from_secs(1),
    );
    let rtt = wait_for(
        &format!("first ICMP reply from {target}"),
        &opts,
        &[FaultKind::Unreachable, FaultKind::Resolve],
        || prober.probe(&target).map(Some),
    )?;
    println!(
        "[{}] {} is reachable (rtt {:.1} ms)",
        Local::now().format("%H:%M:%S"),
        target,
        rtt.as_secs_f64() * 1000.0
    );

    let runner = PingRunner::spawn(&target, Duration::from_millis(config.interval_ms))?;
    let mut last = None;
    for sample in PingGroups::new(runner.lines()) {
        if sample.run_len == 0 && sample.received > 1 {
            println!(
                "[{}] gap in replies before seq {} (run restarted)",
                Local::now().format("%H:%M:%S"),
                sample.sent
            );
        }
        let stable = sample.run_len >= config.stable_run;
        last = Some(sample);
        if stable {
            break;
        }
    }
    runner.stop()?;

    match last {
        Some(sample) => {
            let stats = LossStats::from_sample(&sample);
            println!(
                "[{}] {}: {} sent, {} received, {} lost ({:.1}% loss), stable run of {}",
                Local::now().format("%H:%M:%S"),
                target,
                stats.sent,
                stats.received,
                stats.lost,
                stats.loss_rate,
                sample.run_len
            );
        }
        None => println!("ping produced no replies for {target}"),
    }

    Ok(())
}
