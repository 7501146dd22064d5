use std::collections::VecDeque;

use crate::process::Pid;

/// Only one I/O device exists in this model.
pub const DEVICE_ID: u32 = 0;

/// Counts ticks while a process runs; `Kernel::tick` raises TIMEOUT once
/// `count` exceeds `quantum`. `quantum` is `None` for every discipline
/// except round robin.
pub struct Timer {
    pub count: u32,
    pub quantum: Option<u32>,
}

impl Timer {
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

struct IoDevice {
    busy: bool,
    counter: u32,
    service_time: u32,
}

impl IoDevice {
    fn new(service_time: u32) -> Self {
        Self { busy: false, counter: 0, service_time }
    }

    fn execute(&mut self) {
        assert!(!self.busy, "I/O device re-dispatched while already busy");
        self.busy = true;
        self.counter = 0;
    }

    /// Returns true on the tick the in-progress operation completes.
    fn tick(&mut self) -> bool {
        if !self.busy {
            return false;
        }
        self.counter += 1;
        if self.counter > self.service_time {
            self.busy = false;
            true
        } else {
            false
        }
    }
}

/// The single I/O device plus its pending-operation queue (spec's
/// "I/O controller"): FIFO admission, one operation in service at a time.
pub struct IoController {
    queue: VecDeque<(Pid, String)>,
    device: IoDevice,
    in_service: Option<Pid>,
}

impl IoController {
    pub fn new(service_time: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            device: IoDevice::new(service_time),
            in_service: None,
        }
    }

    pub fn enqueue(&mut self, pid: Pid, op: String) {
        self.queue.push_back((pid, op));
        self.dispatch_if_idle();
    }

    fn dispatch_if_idle(&mut self) {
        if self.device.busy {
            return;
        }
        if let Some((pid, _op)) = self.queue.pop_front() {
            self.device.execute();
            self.in_service = Some(pid);
        }
    }

    /// Drives the device one tick; true if an operation just completed.
    pub fn tick(&mut self) -> bool {
        self.device.tick()
    }

    /// Takes the process whose I/O just completed and starts the next
    /// queued operation, if any.
    pub fn finished_pcb(&mut self) -> Option<Pid> {
        let pid = self.in_service.take();
        self.dispatch_if_idle();
        pid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_after_service_time_ticks() {
        let mut io = IoController::new(2);
        io.enqueue(Pid(1), "IO".to_string());
        assert!(!io.tick());
        assert!(!io.tick());
        assert!(io.tick());
        assert_eq!(io.finished_pcb(), Some(Pid(1)));
    }

    #[test]
    fn second_request_waits_for_the_device_to_free_up() {
        let mut io = IoController::new(1);
        io.enqueue(Pid(1), "IO".to_string());
        io.enqueue(Pid(2), "IO".to_string());
        assert!(io.tick());
        assert_eq!(io.finished_pcb(), Some(Pid(1)));
        assert!(io.tick());
        assert_eq!(io.finished_pcb(), Some(Pid(2)));
    }
}
