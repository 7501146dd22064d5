use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::error;

use crate::config::KernelConfig;
use crate::error::KernelError;
use crate::filesystem::Program;
use crate::kernel::Kernel;

/// The environment-facing boundary: owns the `Kernel` behind one lock —
/// the serializing guard shared between the background clock thread and
/// whatever drives the shell — and exposes it either synchronously
/// (`do_ticks`, `run`) or via a free-running ticker thread (`switch_on`).
pub struct Hardware {
    kernel: Arc<Mutex<Kernel>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    running: Arc<AtomicBool>,
    pub time_unit: Duration,
}

impl Hardware {
    pub fn setup(config: KernelConfig) -> Self {
        Self {
            kernel: Arc::new(Mutex::new(Kernel::new(config))),
            ticker: Mutex::new(None),
            running: Arc::new(AtomicBool::new(false)),
            time_unit: Duration::from_millis(100),
        }
    }

    /// Starts the background clock thread. A no-op if it's already on.
    pub fn switch_on(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let kernel = Arc::clone(&self.kernel);
        let running = Arc::clone(&self.running);
        let period = self.time_unit;
        let handle = thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                let fatal = {
                    let mut kernel = kernel.lock().expect("kernel mutex poisoned");
                    kernel.tick().err()
                };
                if let Some(err) = fatal {
                    error!("fatal kernel error, halting clock: {err}");
                    running.store(false, Ordering::SeqCst);
                    break;
                }
                thread::sleep(period);
            }
        });
        *self.ticker.lock().expect("ticker mutex poisoned") = Some(handle);
    }

    /// Stops the background clock thread and waits for it to exit.
    pub fn switch_off(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.ticker.lock().expect("ticker mutex poisoned").take() {
            let _ = handle.join();
        }
    }

    /// Synchronous stepping for tests and the shell's manual `tick`
    /// command: advances the clock `n` times without touching the
    /// background thread.
    pub fn do_ticks(&self, n: u32) -> Result<(), KernelError> {
        self.kernel.lock().expect("kernel mutex poisoned").do_ticks(n)
    }

    pub fn run(&self, path: impl Into<String>, priority: u8) -> Result<(), KernelError> {
        self.kernel.lock().expect("kernel mutex poisoned").run(path, priority)
    }

    pub fn file_system_write(&self, path: impl Into<String>, program: Program) {
        self.kernel
            .lock()
            .expect("kernel mutex poisoned")
            .file_system
            .write(path, program);
    }

    /// Read-only introspection under the same guard — used by the
    /// shell's `pcbtable`/`memory` commands.
    pub fn with_kernel<R>(&self, f: impl FnOnce(&Kernel) -> R) -> R {
        f(&self.kernel.lock().expect("kernel mutex poisoned"))
    }
}

impl Drop for Hardware {
    fn drop(&mut self) {
        self.switch_off();
    }
}
