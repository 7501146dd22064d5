use kernel::{Hardware, KernelConfig, SchedulerKind};
use kernel::ProcessState;

fn counting_program() -> Vec<String> {
    ["STORA", "9", "DECA", "JNZ", "2", "EXIT"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

#[test]
fn runner_is_preempted_exactly_at_the_quantum_boundary() {
    let hardware = Hardware::setup(KernelConfig {
        memory_cells: 64,
        frame_size: 8,
        scheduler: SchedulerKind::RoundRobin { quantum: 3 },
        ..KernelConfig::default()
    });

    hardware.file_system_write("a.prog", counting_program());
    hardware.file_system_write("b.prog", counting_program());

    hardware.run("a.prog", 0).unwrap();
    hardware.run("b.prog", 0).unwrap();

    // Ticks 1-3 execute pid 1's first three instructions; tick 4 exceeds
    // the quantum and TIMEOUT swaps pid 2 in instead of stepping pid 1 again.
    hardware.do_ticks(4).unwrap();

    hardware.with_kernel(|k| {
        let table = k.pcb_table();
        let first = table.iter().find(|p| p.pid.0 == 1).unwrap();
        let second = table.iter().find(|p| p.pid.0 == 2).unwrap();
        assert_eq!(first.state, ProcessState::Ready);
        assert_eq!(second.state, ProcessState::Running);
    });
}
