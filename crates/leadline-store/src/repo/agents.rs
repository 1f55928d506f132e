use crate::error::{Result, StoreError};
use leadline_core::domain::{Agent, AgentName, Role};
use rusqlite::{params, Connection, OptionalExtension};

pub struct AgentsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> AgentsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn add(&self, now_utc: i64, user_name: &AgentName, role: Role) -> Result<Agent> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO agents (user_name, role, created_at) VALUES (?1, ?2, ?3);",
            params![user_name.as_str(), role.as_str(), now_utc],
        )?;
        if inserted == 0 {
            return Err(StoreError::DuplicateAgent(user_name.to_string()));
        }
        Ok(Agent {
            user_name: user_name.clone(),
            role,
            created_at: now_utc,
        })
    }

    pub fn get(&self, user_name: &AgentName) -> Result<Option<Agent>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_name, role, created_at FROM agents WHERE user_name = ?1;",
        )?;
        let mut rows = stmt.query([user_name.as_str()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(agent_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Resolves an acting principal by name, failing when the directory has
    /// no such agent.
    pub fn require(&self, user_name: &AgentName) -> Result<Agent> {
        self.get(user_name)?
            .ok_or_else(|| StoreError::UnknownAgent(user_name.to_string()))
    }

    pub fn list_all(&self) -> Result<Vec<Agent>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_name, role, created_at FROM agents ORDER BY user_name ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut agents = Vec::new();
        while let Some(row) = rows.next()? {
            agents.push(agent_from_row(row)?);
        }
        Ok(agents)
    }

    /// The round-robin pool: distinct `role = user` names in alphabetical
    /// order.
    pub fn assignment_pool(&self) -> Result<Vec<AgentName>> {
        assignment_pool_inner(self.conn)
    }

    /// Live non-escalated lead counts per eligible transfer candidate,
    /// excluding the current owner, in pool order.
    pub fn open_lead_counts(&self, exclude: Option<&AgentName>) -> Result<Vec<(AgentName, i64)>> {
        open_lead_counts_inner(self.conn, exclude)
    }
}

pub(crate) fn assignment_pool_inner(conn: &Connection) -> Result<Vec<AgentName>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT user_name FROM agents WHERE role = 'user' ORDER BY user_name ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut pool = Vec::new();
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        let name = AgentName::new(&raw).map_err(|_| StoreError::InvalidId(raw.clone()))?;
        pool.push(name);
    }
    Ok(pool)
}

pub(crate) fn open_lead_counts_inner(
    conn: &Connection,
    exclude: Option<&AgentName>,
) -> Result<Vec<(AgentName, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT a.user_name, COUNT(l.lead_id)
         FROM agents a
         LEFT JOIN leads l
           ON LOWER(TRIM(COALESCE(l.assigned_to, ''))) = a.user_name
          AND l.escalated = 0
         WHERE a.role = 'user'
           AND (?1 IS NULL OR a.user_name <> ?1)
         GROUP BY a.user_name
         ORDER BY a.user_name ASC;",
    )?;
    let mut rows = stmt.query([exclude.map(|name| name.as_str())])?;
    let mut counts = Vec::new();
    while let Some(row) = rows.next()? {
        let raw: String = row.get(0)?;
        let name = AgentName::new(&raw).map_err(|_| StoreError::InvalidId(raw.clone()))?;
        let count: i64 = row.get(1)?;
        counts.push((name, count));
    }
    Ok(counts)
}

fn agent_from_row(row: &rusqlite::Row<'_>) -> Result<Agent> {
    let raw_name: String = row.get(0)?;
    let user_name = AgentName::new(&raw_name).map_err(|_| StoreError::InvalidId(raw_name.clone()))?;
    let raw_role: String = row.get(1)?;
    let role = Role::parse(&raw_role).map_err(StoreError::Core)?;
    Ok(Agent {
        user_name,
        role,
        created_at: row.get(2)?,
    })
}
