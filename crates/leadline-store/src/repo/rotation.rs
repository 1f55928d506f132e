use crate::error::Result;
use rusqlite::Connection;

/// Single-row assignment cursor. The counter only ever grows; callers map
/// it onto the pool with a modulus at read time.
pub struct RotationRepo<'a> {
    conn: &'a Connection,
}

impl<'a> RotationRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Claims `n` consecutive assignment slots and returns the counter value
    /// before the advance. The increment happens in one UPDATE so two
    /// concurrent callers can never hand out the same slot.
    pub fn take_slots(&self, n: usize) -> Result<i64> {
        take_slots_inner(self.conn, n)
    }

    pub fn position(&self) -> Result<i64> {
        let position: i64 =
            self.conn
                .query_row("SELECT last_index FROM rotation WHERE id = 1;", [], |row| {
                    row.get(0)
                })?;
        Ok(position)
    }
}

pub(crate) fn take_slots_inner(conn: &Connection, n: usize) -> Result<i64> {
    let after: i64 = conn.query_row(
        "UPDATE rotation SET last_index = last_index + ?1 WHERE id = 1 RETURNING last_index;",
        [n as i64],
        |row| row.get(0),
    )?;
    Ok(after - n as i64)
}
