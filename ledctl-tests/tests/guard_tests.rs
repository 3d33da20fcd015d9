//! Integration Tests für den Prozess-Guard
//!
//! Nutzt eine erfundene Prozesstabelle statt `ps` und `kill(2)`.

mod common;

use std::cell::Cell;
use std::time::Duration;

use common::FakeProcessTable;
use ledctl::config::{GUARD_GRACE, LOOP_SIGNATURE};
use ledctl::hal::parse_ps_output;
use ledctl_core::{ProcessGuard, ProcessRecord, StopSignal};

const OWN_PID: u32 = 100;

fn busy_host() -> FakeProcessTable {
    FakeProcessTable::with(&[
        (1, "/sbin/init"),
        (OWN_PID, "/usr/local/bin/ledctl setpattern stillred --no-kill-existing"),
        (200, "/usr/local/bin/ledctl setpattern alarm"),
        (300, "ledctl setpattern breathered -s 2"),
        (400, "ledctl setpattern list"),
        (500, "vim /home/pi/ledctl/notes.txt"),
        (600, "ledctl setmode cycle -b 3"),
    ])
}

// ============================================================================
// Tests: find_running()
// ============================================================================

#[test]
fn test_find_running_excludes_self_and_admin_calls() {
    let table = busy_host();
    let guard = ProcessGuard::new(&table, &table, OWN_PID).with_signature(LOOP_SIGNATURE);

    let pids: Vec<u32> = guard.find_running().iter().map(|r| r.pid).collect();

    assert_eq!(pids, [200, 300]);
}

#[test]
fn test_admin_calls_with_port_flag_are_not_loops() {
    let table = FakeProcessTable::with(&[
        (210, "ledctl setpattern -p /dev/ttyUSB0 list"),
        (220, "ledctl setpattern -B 9600 --json status"),
        (230, "ledctl setpattern --json"),
        (240, "ledctl setpattern -p /dev/ttyUSB0 stillred"),
    ]);
    let guard = ProcessGuard::new(&table, &table, OWN_PID).with_signature(LOOP_SIGNATURE);

    guard.terminate_all(Duration::ZERO, |_| {});

    assert_eq!(table.signals(), [(240, StopSignal::Graceful)]);
    assert!(table.alive(210));
    assert!(table.alive(220));
}

#[test]
fn test_find_running_with_failing_lister_is_empty() {
    let table = FakeProcessTable {
        fail_list: true,
        ..busy_host()
    };
    let guard = ProcessGuard::new(&table, &table, OWN_PID);

    assert!(guard.find_running().is_empty());
}

// ============================================================================
// Tests: terminate_all()
// ============================================================================

#[test]
fn test_terminate_signals_exactly_foreign_loops() {
    let table = busy_host();
    let guard = ProcessGuard::new(&table, &table, OWN_PID);
    let waited = Cell::new(None);

    let count = guard.terminate_all(GUARD_GRACE, |d| waited.set(Some(d)));

    assert_eq!(count, 2);
    assert_eq!(
        table.signals(),
        [(200, StopSignal::Graceful), (300, StopSignal::Graceful)]
    );
    assert!(table.signals().iter().all(|(pid, _)| *pid != OWN_PID));
    assert_eq!(waited.get(), Some(Duration::from_millis(800)));
    assert!(table.alive(OWN_PID));
    assert!(!table.alive(200));
    assert!(!table.alive(300));
}

#[test]
fn test_survivor_is_killed_forcefully() {
    let table = FakeProcessTable {
        ignore_term: vec![300],
        ..busy_host()
    };
    let guard = ProcessGuard::new(&table, &table, OWN_PID);

    let count = guard.terminate_all(Duration::ZERO, |_| {});

    assert_eq!(count, 2);
    assert_eq!(
        table.signals(),
        [
            (200, StopSignal::Graceful),
            (300, StopSignal::Graceful),
            (300, StopSignal::Forceful),
        ]
    );
    assert!(!table.alive(300));
}

#[test]
fn test_loop_started_during_grace_is_not_killed() {
    let table = busy_host();
    let guard = ProcessGuard::new(&table, &table, OWN_PID);

    let count = guard.terminate_all(Duration::ZERO, |_| {
        table
            .records
            .borrow_mut()
            .push(ProcessRecord::new(700, "ledctl setpattern stillblue"));
    });

    assert_eq!(count, 2);
    assert!(table.signals().iter().all(|(pid, _)| *pid != 700));
    assert!(table.alive(700));
}

#[test]
fn test_nothing_running_does_not_wait() {
    let table = FakeProcessTable::with(&[(OWN_PID, "ledctl setpattern alarm")]);
    let guard = ProcessGuard::new(&table, &table, OWN_PID);
    let waited = Cell::new(false);

    let count = guard.terminate_all(GUARD_GRACE, |_| waited.set(true));

    assert_eq!(count, 0);
    assert!(!waited.get());
    assert!(table.signals().is_empty());
}

#[test]
fn test_failing_lister_signals_nobody() {
    let table = FakeProcessTable {
        fail_list: true,
        ..busy_host()
    };
    let guard = ProcessGuard::new(&table, &table, OWN_PID);

    assert_eq!(guard.terminate_all(GUARD_GRACE, |_| {}), 0);
    assert!(table.signals().is_empty());
}

// ============================================================================
// Tests: ps-Ausgabe → Guard
// ============================================================================

#[test]
fn test_ps_output_feeds_guard() {
    let ps = "\
    1 /sbin/init splash
  812 /usr/bin/python3 -m http.server
 4242 /home/pi/.cargo/bin/ledctl setpattern alarm --no-kill-existing
 4243 ledctl setpattern status
 4300 ledctl setpattern stillblue -b 2
";
    let table = FakeProcessTable::default();
    *table.records.borrow_mut() = parse_ps_output(ps);
    let guard = ProcessGuard::new(&table, &table, 4300).with_signature(LOOP_SIGNATURE);

    let found = guard.find_running();

    assert_eq!(
        found,
        [ProcessRecord::new(
            4242,
            "/home/pi/.cargo/bin/ledctl setpattern alarm --no-kill-existing"
        )]
    );
}
