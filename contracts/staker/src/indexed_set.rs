//! Set of token ids with constant time add, remove, membership and positional lookup.
//!
//! Positions are stored with a `+1` offset so that a missing entry (0) means "not a member".
//! Removal moves the last element into the freed slot, so positions of other members may
//! change between calls. Readers paginating the set must tolerate that.

use meridian::{
    error::{ErrorCode, MeridianResult},
    validate,
};
use soroban_sdk::{BytesN, Env};

use crate::storage::{erase, load, save, DataKey};

/// Backing storage for an [`IndexedSet`].
pub trait SetStorage {
    fn env(&self) -> &Env;

    fn len(&self) -> u32;

    fn set_len(&mut self, len: u32);

    /// One-based position of `id`, 0 when absent
    fn position(&self, id: u128) -> u32;

    fn set_position(&mut self, id: u128, position: u32);

    fn remove_position(&mut self, id: u128);

    fn value_at(&self, index: u32) -> Option<u128>;

    fn set_value_at(&mut self, index: u32, id: u128);

    fn remove_value_at(&mut self, index: u32);
}

pub struct IndexedSet<S: SetStorage> {
    store: S,
}

impl<S: SetStorage> IndexedSet<S> {
    pub fn new(store: S) -> Self {
        IndexedSet { store }
    }

    pub fn len(&self) -> u32 {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: u128) -> bool {
        self.store.position(id) != 0
    }

    pub fn at(&self, index: u32) -> Option<u128> {
        if index >= self.store.len() {
            return None;
        }
        self.store.value_at(index)
    }

    pub fn add(&mut self, id: u128) -> MeridianResult {
        validate!(
            self.store.env(),
            !self.contains(id),
            ErrorCode::AlreadyInSet,
            "IndexedSet: token {} already present",
            id
        )?;

        let index = self.store.len();
        let len = index.checked_add(1).ok_or(ErrorCode::MathError)?;

        self.store.set_value_at(index, id);
        self.store.set_position(id, len);
        self.store.set_len(len);

        Ok(())
    }

    pub fn remove(&mut self, id: u128) -> MeridianResult {
        let position = self.store.position(id);
        validate!(
            self.store.env(),
            position != 0,
            ErrorCode::NotInSet,
            "IndexedSet: token {} not present",
            id
        )?;

        let index = position - 1;
        let last_index = self.store.len() - 1;

        if index != last_index {
            let last_id = self
                .store
                .value_at(last_index)
                .ok_or(ErrorCode::NotInSet)?;
            self.store.set_value_at(index, last_id);
            self.store.set_position(last_id, position);
        }

        self.store.remove_value_at(last_index);
        self.store.remove_position(id);
        self.store.set_len(last_index);

        Ok(())
    }
}

/// Staked tokens of a single incentive, kept in persistent storage.
pub struct StakedTokens<'a> {
    env: &'a Env,
    incentive_id: BytesN<32>,
}

impl<'a> StakedTokens<'a> {
    pub fn new(env: &'a Env, incentive_id: &BytesN<32>) -> Self {
        StakedTokens {
            env,
            incentive_id: incentive_id.clone(),
        }
    }
}

pub fn staked_tokens<'a>(env: &'a Env, incentive_id: &BytesN<32>) -> IndexedSet<StakedTokens<'a>> {
    IndexedSet::new(StakedTokens::new(env, incentive_id))
}

impl SetStorage for StakedTokens<'_> {
    fn env(&self) -> &Env {
        self.env
    }

    fn len(&self) -> u32 {
        load(self.env, &DataKey::StakedTokenCount(self.incentive_id.clone())).unwrap_or(0)
    }

    fn set_len(&mut self, len: u32) {
        let key = DataKey::StakedTokenCount(self.incentive_id.clone());
        if len == 0 {
            erase(self.env, &key);
        } else {
            save(self.env, &key, &len);
        }
    }

    fn position(&self, id: u128) -> u32 {
        load(
            self.env,
            &DataKey::StakedTokenPosition(self.incentive_id.clone(), id),
        )
        .unwrap_or(0)
    }

    fn set_position(&mut self, id: u128, position: u32) {
        save(
            self.env,
            &DataKey::StakedTokenPosition(self.incentive_id.clone(), id),
            &position,
        );
    }

    fn remove_position(&mut self, id: u128) {
        erase(
            self.env,
            &DataKey::StakedTokenPosition(self.incentive_id.clone(), id),
        );
    }

    fn value_at(&self, index: u32) -> Option<u128> {
        load(self.env, &DataKey::StakedTokenAt(self.incentive_id.clone(), index))
    }

    fn set_value_at(&mut self, index: u32, id: u128) {
        save(
            self.env,
            &DataKey::StakedTokenAt(self.incentive_id.clone(), index),
            &id,
        );
    }

    fn remove_value_at(&mut self, index: u32) {
        erase(
            self.env,
            &DataKey::StakedTokenAt(self.incentive_id.clone(), index),
        );
    }
}
