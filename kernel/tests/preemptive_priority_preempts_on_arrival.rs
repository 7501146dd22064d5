use kernel::{Hardware, KernelConfig, ProcessState, SchedulerKind};

fn counting_program() -> Vec<String> {
    ["STORA", "9", "DECA", "JNZ", "2", "EXIT"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

#[test]
fn higher_priority_arrival_preempts_immediately_without_a_tick() {
    let hardware = Hardware::setup(KernelConfig {
        memory_cells: 64,
        frame_size: 8,
        scheduler: SchedulerKind::PriorityPreemptive { aging_k: 1000 },
        ..KernelConfig::default()
    });

    hardware.file_system_write("low.prog", counting_program());
    hardware.file_system_write("high.prog", counting_program());

    hardware.run("low.prog", 3).unwrap();
    hardware.run("high.prog", 0).unwrap();

    // No ticks at all: admission itself triggers the preemption.
    hardware.with_kernel(|k| {
        let table = k.pcb_table();
        let low = table.iter().find(|p| p.pid.0 == 1).unwrap();
        let high = table.iter().find(|p| p.pid.0 == 2).unwrap();
        assert_eq!(low.state, ProcessState::Ready);
        assert_eq!(high.state, ProcessState::Running);
    });
}

#[test]
fn equal_priority_arrival_does_not_preempt() {
    let hardware = Hardware::setup(KernelConfig {
        memory_cells: 64,
        frame_size: 8,
        scheduler: SchedulerKind::PriorityPreemptive { aging_k: 1000 },
        ..KernelConfig::default()
    });

    hardware.file_system_write("a.prog", counting_program());
    hardware.file_system_write("b.prog", counting_program());

    hardware.run("a.prog", 2).unwrap();
    hardware.run("b.prog", 2).unwrap();

    hardware.with_kernel(|k| {
        let table = k.pcb_table();
        let a = table.iter().find(|p| p.pid.0 == 1).unwrap();
        let b = table.iter().find(|p| p.pid.0 == 2).unwrap();
        assert_eq!(a.state, ProcessState::Running);
        assert_eq!(b.state, ProcessState::Ready);
    });
}
