//! pidlister - canary that lists every task visible to it.
//!
//! Prints one line per task: PID, TID, task name and the name of the task
//! reading the iterator (which should be us). With `--ns` the pin must be a
//! namespace-aware task info iterator; each line then also shows the local
//! PID/TID (0 for tasks outside our PID namespace).
//!
//! Run:
//!   sudo PIDHORIZON_PIN=/sys/fs/bpf/task_info ./target/release/pidlister
//!   sudo ./target/release/pidlister --ns /sys/fs/bpf/task_ns_info

use std::process::ExitCode;

use log::error;

use nsiter_core::iter::records;
use nsiter_module::config::SourceConfig;
use nsiter_module::task_records::{TaskInfo, TaskNsInfo};
use nsiter_module::task_source::TaskIterSource;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("PIDHORIZON_LOG", "info"))
        .init();

    let mut ns = false;
    let mut config = SourceConfig::from_env();
    for arg in std::env::args_os().skip(1) {
        if arg == "--ns" {
            ns = true;
        } else {
            config = config.pin(arg);
        }
    }

    let mut source = match TaskIterSource::from_config(&config) {
        Ok(source) => source,
        Err(e) => {
            error!("cannot set up task iterator: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let res = if ns {
        records::<_, TaskNsInfo>(&mut source).try_for_each(|task| {
            task.map(|t| {
                println!(
                    "{} {} {} {} {:?} {:?}",
                    t.pid,
                    t.tid,
                    t.local_pid,
                    t.local_tid,
                    t.name(),
                    t.caller_name()
                )
            })
        })
    } else {
        records::<_, TaskInfo>(&mut source).try_for_each(|task| {
            task.map(|t| println!("{} {} {:?} {:?}", t.pid, t.tid, t.name(), t.caller_name()))
        })
    };

    if let Err(e) = res {
        error!("task iteration failed: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
