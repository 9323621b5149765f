/// Millisecond-timestamp identifier sequence
///
/// Not synchronised on its own: the user store keeps it behind the same lock
/// as the user set, so the uniqueness check and the id assignment happen in
/// one critical section.
#[derive(Debug, Default, Clone)]
pub struct IdSequence {
    last: i64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Seed the high-water mark from ids that already exist
    ///
    /// Non-numeric ids are ignored; they can never collide with a generated one.
    pub fn resume_after<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let last = ids
            .into_iter()
            .filter_map(|id| id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self { last }
    }

    /// Raise the high-water mark past `ids` (e.g. after a bulk replace)
    pub fn observe<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let seen = Self::resume_after(ids).last;
        self.last = self.last.max(seen);
    }

    /// Next id: the current millisecond, bumped past anything already issued
    ///
    /// Because the mark starts above every numeric id in the set, a generated
    /// id can never equal one that already exists. `None` once the mark has
    /// reached `i64::MAX`; the sequence is left unchanged.
    pub fn next(&mut self, now_millis: i64) -> Option<String> {
        let candidate = now_millis.max(self.last.checked_add(1)?);
        self.last = candidate;
        Some(candidate.to_string())
    }

    pub fn last(&self) -> i64 {
        self.last
    }
}
