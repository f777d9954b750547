use crate::types::{
    BLOCK_SIZE, BlockId, PAGE_HEADER_SIZE, RecordId, SLOT_DIRECTORY_ENTRY_SIZE,
    codec::{read_u16, write_u16},
    error::{DatabaseError, Result},
};

/*
 * Block Layout (Slotted Page Structure)
 * ┌─────────────────────────────────────────────────────────────────┐
 * │  PAGE HEADER: num_records(2) | end_free(2)                      │
 * ├─────────────────────────────────────────────────────────────────┤
 * │  SLOT DIRECTORY                                                 │
 * │  [slot1: size(2)|location(2)] [slot2: size(2)|location(2)] ...  │
 * ├─────────────────────────────────────────────────────────────────┤
 * │                    FREE SPACE (ends at end_free)                │
 * ├─────────────────────────────────────────────────────────────────┤
 * │  RECORD DATA                                                    │
 * │  [...record N...] ... [...record 2...] [...record 1...]         │
 * └─────────────────────────────────────────────────────────────────┘
 *
 * Slot `i` lives at offset 4*i, so slot 0 is the page header itself.
 * A slot of (0, 0) is a tombstone; its record id is never handed out again.
 */

/// Location of one live record inside its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub size: u16,
    pub location: u16,
}

#[derive(Debug, Clone)]
pub struct SlottedPage {
    block_id: BlockId,
    num_records: u16,
    end_free: u16,
    data: Vec<u8>,
}

impl SlottedPage {
    /// Wrap a block buffer. A new page gets a fresh header written into the
    /// buffer; an existing one has its header read back out of it.
    pub fn new(data: Vec<u8>, block_id: BlockId, is_new: bool) -> Result<Self> {
        if data.len() != BLOCK_SIZE {
            return Err(DatabaseError::InvalidBlockSize {
                expected: BLOCK_SIZE,
                actual: data.len(),
            });
        }

        let mut page = Self {
            block_id,
            num_records: 0,
            end_free: (BLOCK_SIZE - 1) as u16,
            data,
        };

        if is_new {
            page.write_page_header();
        } else {
            let (num_records, end_free) = page.get_header(0);
            page.num_records = num_records;
            page.end_free = end_free;
        }

        Ok(page)
    }

    /// Largest payload an empty block can take.
    pub const fn max_record_size() -> usize {
        BLOCK_SIZE - PAGE_HEADER_SIZE - SLOT_DIRECTORY_ENTRY_SIZE
    }

    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn num_records(&self) -> u16 {
        self.num_records
    }

    pub fn end_free(&self) -> u16 {
        self.end_free
    }

    /// Bytes left for a new record once its slot has been reserved.
    pub fn available(&self) -> usize {
        (self.end_free as usize + 1).saturating_sub(self.slot_table_end(self.num_records as usize + 1))
    }

    pub fn has_room(&self, size: usize) -> bool {
        self.slot_table_end(self.num_records as usize + 1) + size <= self.end_free as usize + 1
    }

    /// Add a new record to the block and return its id.
    pub fn add(&mut self, payload: &[u8]) -> Result<RecordId> {
        if !self.has_room(payload.len()) {
            return Err(DatabaseError::NoRoom {
                block_id: self.block_id,
                needed: payload.len(),
                available: self.available(),
            });
        }

        let id = self.num_records + 1;
        let size = payload.len() as u16;
        self.num_records = id;
        self.end_free -= size;
        let location = self.end_free + 1;

        let start = location as usize;
        self.data[start..start + payload.len()].copy_from_slice(payload);
        self.put_header(id, size, location);
        self.write_page_header();

        Ok(id)
    }

    /// Bytes of a live record, or `None` for a tombstone or an id never handed out.
    pub fn get(&self, record_id: RecordId) -> Option<&[u8]> {
        self.slot(record_id).map(|slot| {
            let start = slot.location as usize;
            &self.data[start..start + slot.size as usize]
        })
    }

    /// Replace a record's bytes, keeping its id.
    pub fn put(&mut self, record_id: RecordId, payload: &[u8]) -> Result<()> {
        let slot = self.live_slot(record_id)?;
        let size = slot.size as usize;
        let location = slot.location as usize;
        let new_size = payload.len();

        if new_size > size {
            let extra = new_size - size;
            if self.slot_table_end(self.num_records as usize) + extra > self.end_free as usize + 1 {
                return Err(DatabaseError::NoRoom {
                    block_id: self.block_id,
                    needed: extra,
                    available: self.free_space(),
                });
            }
            let new_location = location - extra;
            self.slide(location, new_location);
            self.data[new_location..new_location + new_size].copy_from_slice(payload);
            self.put_header(record_id, new_size as u16, new_location as u16);
        } else {
            self.data[location..location + new_size].copy_from_slice(payload);
            // Shrunk size first, so slide() carries this record along with the ones below it
            self.put_header(record_id, new_size as u16, location as u16);
            self.slide(location + new_size, location + size);
        }

        Ok(())
    }

    /// Tombstone a record and compact the space it held.
    pub fn del(&mut self, record_id: RecordId) -> Result<()> {
        let slot = self.live_slot(record_id)?;
        self.put_header(record_id, 0, 0);
        let location = slot.location as usize;
        self.slide(location, location + slot.size as usize);
        Ok(())
    }

    /// Ids of all live records, ascending.
    pub fn ids(&self) -> Vec<RecordId> {
        (1..=self.num_records)
            .filter(|&id| self.slot(id).is_some())
            .collect()
    }

    pub fn slot(&self, record_id: RecordId) -> Option<Slot> {
        if record_id == 0 || record_id > self.num_records {
            return None;
        }
        match self.get_header(record_id) {
            (_, 0) => None,
            (size, location) => Some(Slot { size, location }),
        }
    }

    fn live_slot(&self, record_id: RecordId) -> Result<Slot> {
        if record_id == 0 || record_id > self.num_records {
            return Err(DatabaseError::InvalidRecordId {
                record_id,
                max: self.num_records,
            });
        }
        self.slot(record_id).ok_or(DatabaseError::RecordDeleted {
            block_id: self.block_id,
            record_id,
        })
    }

    /// Move the record bytes in `[end_free+1, start)` by `end - start` and
    /// repoint every live slot whose bytes lie inside that range. A positive
    /// shift closes a gap, a negative one opens a gap of that size just
    /// before `start`. An empty record at `start` counts as inside.
    fn slide(&mut self, start: usize, end: usize) {
        let shift = end as isize - start as isize;
        if shift == 0 {
            return;
        }

        let from = self.end_free as usize + 1;
        let to = (from as isize + shift) as usize;
        self.data.copy_within(from..start, to);
        if shift > 0 {
            self.data[from..to].fill(0);
        }

        for id in self.ids() {
            let (size, location) = self.get_header(id);
            if location as usize + size as usize <= start {
                let location = (location as isize + shift) as u16;
                self.put_header(id, size, location);
            }
        }

        self.end_free = (self.end_free as isize + shift) as u16;
        self.write_page_header();
    }

    /// Unreserved bytes between the slot directory and the record data.
    fn free_space(&self) -> usize {
        (self.end_free as usize + 1).saturating_sub(self.slot_table_end(self.num_records as usize))
    }

    fn slot_table_end(&self, num_records: usize) -> usize {
        PAGE_HEADER_SIZE + num_records * SLOT_DIRECTORY_ENTRY_SIZE
    }

    fn get_header(&self, id: RecordId) -> (u16, u16) {
        let offset = id as usize * SLOT_DIRECTORY_ENTRY_SIZE;
        (read_u16(&self.data, offset), read_u16(&self.data, offset + 2))
    }

    fn put_header(&mut self, id: RecordId, size: u16, location: u16) {
        let offset = id as usize * SLOT_DIRECTORY_ENTRY_SIZE;
        write_u16(&mut self.data, offset, size);
        write_u16(&mut self.data, offset + 2, location);
    }

    fn write_page_header(&mut self) {
        self.put_header(0, self.num_records, self.end_free);
    }
}
