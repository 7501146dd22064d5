use std::collections::HashMap;

use super::page::Page;
use super::swap::SwapStore;
use super::Memory;
use crate::error::KernelError;
use crate::process::Pid;

/// Chooses which resident page to evict when no frame is free.
pub trait ReplacementPolicy: Send {
    fn select_victim(&mut self, resident: &mut Vec<Page>) -> Page;
}

/// Evicts whichever page has been resident longest.
#[derive(Default)]
pub struct FifoPolicy;

impl ReplacementPolicy for FifoPolicy {
    fn select_victim(&mut self, resident: &mut Vec<Page>) -> Page {
        resident.remove(0)
    }
}

/// FIFO with a reprieve: a page whose `chance` bit is set gets it cleared
/// and is moved to the back of the queue instead of being evicted.
#[derive(Default)]
pub struct SecondChancePolicy;

impl ReplacementPolicy for SecondChancePolicy {
    fn select_victim(&mut self, resident: &mut Vec<Page>) -> Page {
        loop {
            let mut candidate = resident.remove(0);
            if candidate.chance {
                candidate.chance = false;
                resident.push(candidate);
            } else {
                return candidate;
            }
        }
    }
}

/// Owns the free-frame pool, every process's page table, and the resident
/// set used for eviction. The MMU/TLB holds the *running* process's page
/// table while it runs; `sync_page_table` reconciles that copy back in on
/// deschedule (see `dispatcher::save`).
pub struct MemoryManager {
    free: Vec<usize>,
    resident: Vec<Page>,
    page_tables: HashMap<Pid, Vec<Page>>,
    policy: Box<dyn ReplacementPolicy>,
}

impl MemoryManager {
    pub fn new(num_frames: usize, policy: Box<dyn ReplacementPolicy>) -> Self {
        Self {
            free: (0..num_frames).rev().collect(),
            resident: Vec::new(),
            page_tables: HashMap::new(),
            policy,
        }
    }

    pub fn put_page_table(&mut self, pid: Pid, pages: Vec<Page>) {
        self.page_tables.insert(pid, pages);
    }

    pub fn take_page_table(&mut self, pid: Pid) -> Vec<Page> {
        self.page_tables.remove(&pid).unwrap_or_default()
    }

    pub fn get_page_table(&self, pid: Pid) -> &Vec<Page> {
        self.page_tables.get(&pid).expect("process has no page table")
    }

    pub fn set_page(&mut self, pid: Pid, index: usize, page: Page) {
        let table = self.page_tables.get_mut(&pid).expect("process has no page table");
        table[index] = page;
    }

    pub fn mark_resident(&mut self, page: Page) {
        self.resident.push(page);
    }

    /// Refreshes a resident page's dirty bit from the TLB's live copy.
    /// The TLB, not `resident`, is where a write actually sets `dirty` for
    /// whichever process is running — this reconciles the two before
    /// `allocate_frame` reads `resident` to pick a victim.
    pub fn mark_dirty(&mut self, pid: Pid, page_index: usize) {
        if let Some(page) = self
            .resident
            .iter_mut()
            .find(|r| r.owner_pid == pid && r.page_index == page_index)
        {
            page.dirty = true;
        }
    }

    /// Writes the TLB's (possibly fresher) page copies back into the
    /// canonical page table and into the resident set, keyed by identity
    /// (owner pid + page index) rather than position.
    pub fn sync_page_table(&mut self, pid: Pid, pages: Vec<Page>) {
        for page in &pages {
            if let Some(slot) = self
                .resident
                .iter_mut()
                .find(|r| r.owner_pid == page.owner_pid && r.page_index == page.page_index)
            {
                *slot = page.clone();
            }
        }
        self.page_tables.insert(pid, pages);
    }

    /// Returns a free frame, evicting a resident page (swapping it out
    /// first if dirty) when the pool is empty. The evicted page, still
    /// carrying its old (valid) frame/dirty state, is handed back to the
    /// caller instead of being patched into `page_tables` here: if the
    /// victim belongs to the process that's currently running, its
    /// authoritative copy lives in the MMU's TLB, not in `page_tables`,
    /// and only the caller (the PAGE_FAULT handler) knows which one to
    /// invalidate.
    pub fn allocate_frame(
        &mut self,
        memory: &mut Memory,
        swap: &mut SwapStore,
    ) -> Result<(usize, Option<Page>), KernelError> {
        if let Some(frame) = self.free.pop() {
            return Ok((frame, None));
        }
        if self.resident.is_empty() {
            return Err(KernelError::Fatal(
                "no free frame and no evictable resident page".to_string(),
            ));
        }
        let victim = self.policy.select_victim(&mut self.resident);
        let frame = victim.frame.expect("resident page without a frame");
        if victim.dirty {
            let snapshot = memory.snapshot_frame(frame);
            swap.save(victim.owner_pid, victim.page_index, snapshot);
        }
        Ok((frame, Some(victim)))
    }

    /// Invalidates a page that isn't the running process's own — i.e. its
    /// authoritative copy is this table, not the MMU's TLB.
    pub fn invalidate_page(&mut self, pid: Pid, page_index: usize) {
        if let Some(table) = self.page_tables.get_mut(&pid) {
            let page = &mut table[page_index];
            page.valid = false;
            page.frame = None;
            page.dirty = false;
        }
    }

    /// Returns a terminated process's still-resident frames to the pool.
    pub fn free_frames(&mut self, pages: &[Page]) {
        for page in pages {
            if let Some(frame) = page.frame {
                self.free.push(frame);
            }
            self.resident
                .retain(|r| !(r.owner_pid == page.owner_pid && r.page_index == page.page_index));
        }
    }

    pub fn resident_pages(&self) -> &[Page] {
        &self.resident
    }

    pub fn free_frame_count(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(pid: usize, index: usize, frame: usize, dirty: bool, chance: bool) -> Page {
        Page {
            frame: Some(frame),
            valid: true,
            dirty,
            chance,
            owner_pid: Pid(pid),
            page_index: index,
        }
    }

    #[test]
    fn fifo_evicts_oldest_resident_first() {
        let mut policy = FifoPolicy;
        let mut resident = vec![page(1, 0, 0, false, false), page(1, 1, 1, false, false)];
        let victim = policy.select_victim(&mut resident);
        assert_eq!(victim.page_index, 0);
        assert_eq!(resident.len(), 1);
    }

    #[test]
    fn second_chance_spares_a_page_with_the_bit_set() {
        let mut policy = SecondChancePolicy;
        let mut resident = vec![page(1, 0, 0, false, true), page(1, 1, 1, false, false)];
        let victim = policy.select_victim(&mut resident);
        assert_eq!(victim.page_index, 1);
        assert_eq!(resident.len(), 1);
        assert_eq!(resident[0].page_index, 0);
        assert!(!resident[0].chance);
    }

    #[test]
    fn allocate_frame_is_fatal_with_nothing_to_evict() {
        let mut mm = MemoryManager::new(0, Box::new(FifoPolicy));
        let mut memory = Memory::new(4, 4);
        let mut swap = SwapStore::new();
        assert!(mm.allocate_frame(&mut memory, &mut swap).is_err());
    }
}
