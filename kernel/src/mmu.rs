use std::collections::HashMap;

use crate::memory::page::Page;

/// Result of a logical-address translation.
pub enum TranslateOutcome {
    Ok(usize),
    /// The page is present in the table but not valid — caller must
    /// service a PAGE_FAULT and retry.
    Fault(usize),
    Fatal(&'static str),
}

/// Holds the currently-running process's page table as a flat map from
/// page index to `Page`, plus the bound `limit` that rejects out-of-range
/// addresses before a page index is even computed.
pub struct Mmu {
    pub frame_size: usize,
    pub limit: i64,
    tlb: HashMap<usize, Page>,
}

impl Mmu {
    pub fn new(frame_size: usize) -> Self {
        Self { frame_size, limit: -1, tlb: HashMap::new() }
    }

    pub fn reset_tlb(&mut self) {
        self.tlb.clear();
    }

    pub fn set_page_frame(&mut self, page_index: usize, page: Page) {
        self.tlb.insert(page_index, page);
    }

    /// Empties the TLB, handing back every page it held — used by
    /// `dispatcher::save` to write the running process's page table back
    /// to the Memory Manager before it's descheduled.
    pub fn drain_tlb(&mut self) -> Vec<Page> {
        self.tlb.drain().map(|(_, page)| page).collect()
    }

    /// Page indices the TLB currently holds dirty, without draining it —
    /// used to refresh the Memory Manager's resident copies before a
    /// PAGE_FAULT picks a victim, since a write only dirties the TLB's
    /// copy, not the one `allocate_frame` reads.
    pub fn dirty_page_indices(&self) -> Vec<usize> {
        self.tlb.iter().filter(|(_, page)| page.dirty).map(|(&index, _)| index).collect()
    }

    pub fn translate(&mut self, logical: i64, for_write: bool) -> TranslateOutcome {
        if logical < 0 || logical > self.limit {
            return TranslateOutcome::Fatal("logical address exceeds process limit");
        }
        let page_index = (logical as usize) / self.frame_size;
        let offset = (logical as usize) % self.frame_size;
        match self.tlb.get_mut(&page_index) {
            None => TranslateOutcome::Fatal("no page table loaded for this page index"),
            Some(page) if !page.valid => TranslateOutcome::Fault(page_index),
            Some(page) => {
                if for_write {
                    page.dirty = true;
                }
                TranslateOutcome::Ok(page.frame.expect("valid page missing a frame") * self.frame_size + offset)
            }
        }
    }
}
