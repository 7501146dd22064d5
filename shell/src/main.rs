use std::io::{self, BufRead, Write};

use kernel::{Hardware, KernelConfig, KernelError, ReplacementPolicyKind, SchedulerKind};
use log::{info, warn};

/// Minimal line-oriented REPL over `kernel::Hardware`. No line editing, no
/// ANSI color — both are explicitly out of scope for the simulator core;
/// this exists only so the crate is runnable end to end.
fn main() {
    env_logger::init();

    let hardware = Hardware::setup(KernelConfig {
        memory_cells: 64,
        frame_size: 4,
        scheduler: SchedulerKind::RoundRobin { quantum: 3 },
        replacement_policy: ReplacementPolicyKind::SecondChance,
        io_device_time: 3,
    });
    hardware.switch_on();
    info!("hardware on, scheduler: round robin (quantum 3)");

    let stdin = io::stdin();
    print_help();
    print_prompt();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let line = line.trim();
        if line.is_empty() {
            print_prompt();
            continue;
        }
        if !dispatch(&hardware, line) {
            break;
        }
        print_prompt();
    }

    hardware.switch_off();
}

fn print_prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn print_help() {
    println!("commands:");
    println!("  new <path> <priority>   admit the program at <path> with priority 0-4");
    println!("  tick [n]                advance the clock n ticks (default 1) without the background thread");
    println!("  pcbtable                dump every process's pid, state, priority, and pc");
    println!("  memory                  dump every memory cell");
    println!("  help                    print this message");
    println!("  exit                    stop the clock and quit");
}

/// Returns false to end the REPL loop.
fn dispatch(hardware: &Hardware, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");

    match command {
        "new" => {
            let path = match parts.next() {
                Some(path) => path,
                None => {
                    warn!("usage: new <path> <priority>");
                    return true;
                }
            };
            let priority: u8 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
            if let Err(err) = hardware.run(path.to_string(), priority) {
                warn!("{err}");
            }
        }
        "tick" => {
            let n: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(1);
            if let Err(err) = hardware.do_ticks(n) {
                warn!("{err}");
            }
        }
        "pcbtable" => {
            hardware.with_kernel(|kernel| {
                println!("{:>5} {:<11} {:>8} {:>6}", "pid", "state", "priority", "pc");
                for pcb in kernel.pcb_table().iter() {
                    println!(
                        "{:>5} {:<11} {:>8} {:>6}",
                        pcb.pid.0,
                        format!("{:?}", pcb.state),
                        pcb.priority,
                        pcb.context.pc
                    );
                }
            });
        }
        "memory" => {
            hardware.with_kernel(|kernel| {
                for (addr, cell) in kernel.memory_dump().iter().enumerate() {
                    println!("{addr:>4}: {cell}");
                }
            });
        }
        "help" => print_help(),
        "exit" | "quit" => return false,
        other => warn!("{}", KernelError::UnknownCommand(other.to_string())),
    }
    true
}
