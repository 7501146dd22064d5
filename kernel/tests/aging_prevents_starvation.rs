use kernel::{Hardware, KernelConfig, ProcessState, SchedulerKind};

fn program(loops: i64) -> Vec<String> {
    vec![
        "STORA".to_string(),
        loops.to_string(),
        "DECA".to_string(),
        "JNZ".to_string(),
        "2".to_string(),
        "EXIT".to_string(),
    ]
}

#[test]
fn a_lowest_priority_process_still_eventually_runs_behind_a_long_runner() {
    let hardware = Hardware::setup(KernelConfig {
        memory_cells: 64,
        frame_size: 8,
        scheduler: SchedulerKind::PriorityNonPreemptive { aging_k: 2 },
        ..KernelConfig::default()
    });

    hardware.file_system_write("runner.prog", program(40));
    hardware.file_system_write("low.prog", program(1));

    hardware.run("runner.prog", 0).unwrap();
    hardware.run("low.prog", 4).unwrap();

    for _ in 0..200 {
        hardware.do_ticks(1).unwrap();
        let low_ran = hardware.with_kernel(|k| {
            k.pcb_table()
                .iter()
                .find(|p| p.pid.0 == 2)
                .map(|p| p.state == ProcessState::Running)
                .unwrap_or(true)
        });
        if low_ran {
            return;
        }
    }
    panic!("low-priority process never got scheduled");
}
