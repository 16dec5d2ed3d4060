use aria_desk_common::*;
use alloc::rc::Rc;

pub const ALARMS_KEY: &str = "alarms";

const RECORD_CAPACITY: usize = 64;

/// 闹钟表
///
/// The five slots live in the key/value store as one postcard record and
/// are written back after every change.
pub struct AlarmBook<K: KeyValueStore> {
    store: Rc<K>,
    slots: [AlarmSlot; ALARM_SLOT_COUNT],
}

impl<K: KeyValueStore> AlarmBook<K> {
    /// Missing or undecodable records fall back to defaults; out-of-range
    /// fields are clamped.
    pub fn load(store: Rc<K>) -> Self {
        let mut buf = [0u8; RECORD_CAPACITY];
        let mut slots = match store.load(ALARMS_KEY, &mut buf) {
            Ok(Some(len)) => match postcard::from_bytes::<[AlarmSlot; ALARM_SLOT_COUNT]>(&buf[..len]) {
                Ok(slots) => slots,
                Err(e) => {
                    warn!("alarm record unreadable ({:?}), using defaults", e);
                    Default::default()
                }
            },
            Ok(None) => {
                info!("no alarm record yet, using defaults");
                Default::default()
            }
            Err(e) => {
                warn!("alarm store failed ({:?}), using defaults", e);
                Default::default()
            }
        };

        for (i, slot) in slots.iter_mut().enumerate() {
            if slot.sanitize() {
                warn!("alarm {} had out-of-range fields, clamped", i);
            }
        }
        Self { store, slots }
    }

    pub fn slots(&self) -> &[AlarmSlot; ALARM_SLOT_COUNT] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&AlarmSlot> {
        self.slots.get(index)
    }

    /// Apply `edit` to one slot and persist the table.
    pub fn update(&mut self, index: usize, edit: impl FnOnce(&mut AlarmSlot)) -> SystemResult<()> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ServiceError::InvalidState)?;
        edit(slot);
        slot.sanitize();
        self.persist()
    }

    pub fn persist(&self) -> SystemResult<()> {
        let bytes = postcard::to_allocvec(&self.slots).map_err(|e| {
            error!("alarm encode failed: {:?}", e);
            StorageError::WriteFailed
        })?;
        self.store.store(ALARMS_KEY, &bytes).map_err(|e| {
            warn!("alarm store write failed: {:?}", e);
            StorageError::WriteFailed
        })?;
        Ok(())
    }
}
