//! pidhorizon End-to-End Smoke Test
//!
//! Runs against the live kernel:
//!   Part A - Environment: privileges, configured task TID iterator
//!   Part B - Mapping: own PID/TID and PID 1 visible with root numbers
//!   Part C - Reverse: root-to-local mapping round-trips
//!   Part D - Lifecycle: repeated passes, idempotent close
//!
//! Run: sudo PIDHORIZON_PIN=/sys/fs/bpf/task_tid ./target/release/pidhorizon-smoke

use nix::unistd::{getpid, gettid, Uid};

use nsiter_core::pid::Pid;
use pidhorizon::{lookup, reverse, Mapping, Outcome, PidHorizon};

// ── Test harness ──

struct TestRunner {
    total: usize,
    passed: usize,
    failed: usize,
}

const LINE: &str = "────────────────────────────────────────────────────────────";

impl TestRunner {
    fn new() -> Self {
        Self { total: 0, passed: 0, failed: 0 }
    }

    fn section(&self, name: &str) {
        println!("\n{}", LINE);
        println!("  {}", name);
        println!("{}", LINE);
    }

    fn check(&mut self, name: &str, ok: bool, reason: &str) {
        self.total += 1;
        if ok {
            self.passed += 1;
            println!("  [{:2}] {:<52} PASS", self.total, name);
        } else {
            self.failed += 1;
            println!("  [{:2}] {:<52} FAIL: {}", self.total, name, reason);
        }
    }

    fn summary(&self) {
        println!("\n{}", LINE);
        println!(
            "  Total: {}  Passed: {}  Failed: {}",
            self.total, self.passed, self.failed
        );
        println!("{}", LINE);
    }
}

// ════════════════════════════════════════════════════════════
// Part A: Environment
// ════════════════════════════════════════════════════════════

fn test_environment(t: &mut TestRunner) -> Option<PidHorizon<i32>> {
    t.section("Part A: Environment");

    t.check("running as root", Uid::effective().is_root(), "task iterators need CAP_BPF + CAP_PERFMON");

    match PidHorizon::<i32>::new() {
        Ok(ph) => {
            t.check("task TID iterator set up", true, "");
            Some(ph)
        }
        Err(e) => {
            t.check("task TID iterator set up", false, &e.to_string());
            None
        }
    }
}

// ════════════════════════════════════════════════════════════
// Part B: Mapping
// ════════════════════════════════════════════════════════════

fn test_mapping(t: &mut TestRunner, ph: &mut PidHorizon<i32>) -> Mapping<i32> {
    t.section("Part B: Local-to-root mapping");

    let (m, outcome) = ph.new_mapping_with_outcome();
    t.check("pass ran to exhaustion", outcome.is_exhausted(), &outcome.to_string());
    t.check(&format!("mapping has {} tasks", m.len()), !m.is_empty(), "empty mapping");

    let pid = getpid().as_raw();
    let root_pid = lookup(&m, pid);
    t.check(
        &format!("own PID {} -> {:?}", pid, root_pid),
        root_pid.is_some(),
        "own PID missing or sentinel",
    );

    let tid = gettid().as_raw();
    t.check(
        &format!("own TID {} -> {:?}", tid, lookup(&m, tid)),
        lookup(&m, tid).is_some(),
        "own TID missing or sentinel",
    );

    t.check(
        &format!("PID 1 -> {:?}", lookup(&m, 1)),
        lookup(&m, 1).is_some(),
        "missing PID 1 (either real PID 1 or local PID 1)",
    );

    let wide: Mapping<u64> = m.iter().map(|(&k, &v)| (k.convert(), v.convert())).collect();
    t.check(
        "u64 view converts back unchanged",
        wide.iter().all(|(&k, &v)| m.get(&k.convert::<i32>()) == Some(&v.convert::<i32>())),
        "bit-pattern conversion lost information",
    );

    m
}

// ════════════════════════════════════════════════════════════
// Part C: Reverse
// ════════════════════════════════════════════════════════════

fn test_reverse(t: &mut TestRunner, m: &Mapping<i32>) {
    t.section("Part C: Root-to-local mapping");

    let r = reverse(m);
    t.check(
        &format!("reverse keeps {} entries", r.len()),
        r.len() == m.len(),
        &format!("expected {} got {}", m.len(), r.len()),
    );
    t.check("reverse(reverse(m)) == m", reverse(&r) == *m, "round-trip differs");

    let pid = getpid().as_raw();
    let back = lookup(m, pid).and_then(|root| lookup(&r, root));
    t.check(
        &format!("own PID {} back from root -> {:?}", pid, back),
        back == Some(pid),
        "root PID does not map back",
    );
}

// ════════════════════════════════════════════════════════════
// Part D: Lifecycle
// ════════════════════════════════════════════════════════════

fn test_lifecycle(t: &mut TestRunner, mut ph: PidHorizon<i32>) {
    t.section("Part D: Lifecycle");

    let again = ph.new_mapping();
    t.check(
        &format!("second pass maps {} tasks", again.len()),
        lookup(&again, getpid().as_raw()).is_some(),
        "second pass lost own PID",
    );

    ph.close();
    ph.close();
    t.check("close twice", ph.is_closed(), "still open");

    let (m, outcome) = ph.new_mapping_with_outcome();
    t.check(
        "pass after close is empty",
        m.is_empty() && matches!(outcome, Outcome::Stopped(_)),
        &outcome.to_string(),
    );
}

// ════════════════════════════════════════════════════════════

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("PIDHORIZON_LOG", "warn"))
        .init();

    println!("=== pidhorizon End-to-End Smoke Test ===");
    let kver = std::fs::read_to_string("/proc/version").unwrap_or_default();
    println!("    kernel: {}", kver.trim().split(' ').nth(2).unwrap_or("?"));

    let mut t = TestRunner::new();

    // Part A
    let Some(mut ph) = test_environment(&mut t) else {
        t.summary();
        std::process::exit(1);
    };

    let m = test_mapping(&mut t, &mut ph);
    test_reverse(&mut t, &m);
    test_lifecycle(&mut t, ph);

    t.summary();
    std::process::exit(if t.failed > 0 { 1 } else { 0 });
}
