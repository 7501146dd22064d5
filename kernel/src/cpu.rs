use crate::error::KernelError;
use crate::interrupts::{Interrupt, InterruptVector};
use crate::kernel::Kernel;

/// The live register file: program counter, general registers A and B, a
/// stack pointer growing upward through the process's own pages, and a
/// zero flag set by arithmetic and comparison instructions. `pc == -1`
/// means no process is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cpu {
    pub pc: i64,
    pub a: i64,
    pub b: i64,
    pub sp: i64,
    pub zf: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Self { pc: -1, a: 0, b: 0, sp: -1, zf: true }
    }

    pub fn busy(&self) -> bool {
        self.pc != -1
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Instruction {
    Cpu,
    Io,
    Exit,
    StorA(i64),
    StorB(i64),
    IncA,
    DecA,
    IncB,
    DecB,
    AddAb,
    CmpAb,
    Jmp(i64),
    Jz(i64),
    Jnz(i64),
    Call(i64),
    Ret,
    PushA,
    PopA,
    PushB,
    PopB,
}

/// One fetch/decode/execute cycle for the currently loaded process.
/// A no-op if the CPU is idle.
pub fn step(kernel: &mut Kernel) -> Result<(), KernelError> {
    if !kernel.cpu.busy() {
        return Ok(());
    }
    let mnemonic = kernel.fetch()?;
    let instruction = decode(kernel, &mnemonic)?;
    execute(kernel, instruction)
}

fn decode(kernel: &mut Kernel, mnemonic: &str) -> Result<Instruction, KernelError> {
    Ok(match mnemonic {
        "CPU" => Instruction::Cpu,
        "IO" => Instruction::Io,
        "EXIT" => Instruction::Exit,
        "STORA" => Instruction::StorA(operand(kernel)?),
        "STORB" => Instruction::StorB(operand(kernel)?),
        "INCA" => Instruction::IncA,
        "DECA" => Instruction::DecA,
        "INCB" => Instruction::IncB,
        "DECB" => Instruction::DecB,
        "ADDAB" => Instruction::AddAb,
        "CMPAB" => Instruction::CmpAb,
        "JMP" => Instruction::Jmp(operand(kernel)?),
        "JZ" => Instruction::Jz(operand(kernel)?),
        "JNZ" => Instruction::Jnz(operand(kernel)?),
        "CALL" => Instruction::Call(operand(kernel)?),
        "RET" => Instruction::Ret,
        "PUSHA" => Instruction::PushA,
        "POPA" => Instruction::PopA,
        "PUSHB" => Instruction::PushB,
        "POPB" => Instruction::PopB,
        other => return Err(KernelError::Fatal(format!("illegal opcode {other:?}"))),
    })
}

fn operand(kernel: &mut Kernel) -> Result<i64, KernelError> {
    let token = kernel.fetch()?;
    token
        .trim()
        .parse()
        .map_err(|_| KernelError::Fatal(format!("malformed operand {token:?}")))
}

fn execute(kernel: &mut Kernel, instruction: Instruction) -> Result<(), KernelError> {
    match instruction {
        Instruction::Cpu => {}
        Instruction::Io => {
            InterruptVector::handle(kernel, Interrupt::IoIn { op: "IO".to_string() })?;
        }
        Instruction::Exit => {
            InterruptVector::handle(kernel, Interrupt::Kill)?;
        }
        Instruction::StorA(v) => kernel.cpu.a = v,
        Instruction::StorB(v) => kernel.cpu.b = v,
        Instruction::IncA => {
            kernel.cpu.a += 1;
            kernel.cpu.zf = kernel.cpu.a == 0;
        }
        Instruction::DecA => {
            kernel.cpu.a -= 1;
            kernel.cpu.zf = kernel.cpu.a == 0;
        }
        Instruction::IncB => {
            kernel.cpu.b += 1;
            kernel.cpu.zf = kernel.cpu.b == 0;
        }
        Instruction::DecB => {
            kernel.cpu.b -= 1;
            kernel.cpu.zf = kernel.cpu.b == 0;
        }
        Instruction::AddAb => {
            kernel.cpu.a += kernel.cpu.b;
            kernel.cpu.zf = kernel.cpu.a == 0;
        }
        Instruction::CmpAb => {
            kernel.cpu.zf = kernel.cpu.a == kernel.cpu.b;
        }
        Instruction::Jmp(addr) => kernel.cpu.pc = addr,
        Instruction::Jz(addr) => {
            if kernel.cpu.zf {
                kernel.cpu.pc = addr;
            }
        }
        Instruction::Jnz(addr) => {
            if !kernel.cpu.zf {
                kernel.cpu.pc = addr;
            }
        }
        Instruction::Call(addr) => {
            kernel.cpu.sp += 1;
            let sp = kernel.cpu.sp;
            let return_pc = kernel.cpu.pc;
            kernel.mem_write(sp, return_pc.to_string())?;
            kernel.cpu.pc = addr;
        }
        Instruction::Ret => {
            let sp = kernel.cpu.sp;
            let saved = kernel.mem_read(sp)?;
            kernel.cpu.pc = saved
                .trim()
                .parse()
                .map_err(|_| KernelError::Fatal(format!("corrupt return address {saved:?}")))?;
            kernel.cpu.sp -= 1;
        }
        Instruction::PushA => {
            kernel.cpu.sp += 1;
            let sp = kernel.cpu.sp;
            let a = kernel.cpu.a;
            kernel.mem_write(sp, a.to_string())?;
        }
        Instruction::PopA => {
            let sp = kernel.cpu.sp;
            let value = kernel.mem_read(sp)?;
            kernel.cpu.a = value.trim().parse().unwrap_or(0);
            kernel.cpu.sp -= 1;
        }
        Instruction::PushB => {
            kernel.cpu.sp += 1;
            let sp = kernel.cpu.sp;
            let b = kernel.cpu.b;
            kernel.mem_write(sp, b.to_string())?;
        }
        Instruction::PopB => {
            let sp = kernel.cpu.sp;
            let value = kernel.mem_read(sp)?;
            kernel.cpu.b = value.trim().parse().unwrap_or(0);
            kernel.cpu.sp -= 1;
        }
    }
    Ok(())
}
