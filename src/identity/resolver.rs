//! Identity Resolver - 主凭证表扫描
//!
//! 主凭证表每个客户一个标签页：A 用户名、B 密码、C 分支、D 受限标记、
//! E 级别、Z 纸质模式，F2 存该客户订单表格的 id。分区在系统外人工
//! 维护，这里只读。
//!
//! 登录按 (用户名, 密码) 全表扫描，首个匹配生效：同名用户只有
//! 迭代顺序更靠前的分区可达。登录后的每次调用按用户名再解析一次；
//! 为了避免每请求 O(分区 × 行) 的扫描，解析结果进一个 TTL 缓存。

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::identity::user::{AccessLevel, CurrentUser};
use crate::store::{Cell, RangeSpec, TabularStore, cell_text};
use crate::utils::{AppError, AppResult};

/// Tabs of the master store that are not client partitions.
const RESERVED_PARTITIONS: [&str; 2] = ["Config", "Readme"];

/// Credential columns within A..Z.
const COL_USERNAME: usize = 0;
const COL_PASSWORD: usize = 1;
const COL_BRANCH: usize = 2;
const COL_RESTRICTED: usize = 3;
const COL_LEVEL: usize = 4;
const COL_PAPER_MODE: usize = 25;

/// The budget sheet id lives in F2, i.e. column F of the first data row.
const COL_BUDGET_ID: usize = 5;

struct CacheEntry {
    user: CurrentUser,
    cached_at: Instant,
}

pub struct IdentityResolver {
    store: Arc<dyn TabularStore>,
    master_id: String,
    cache: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn TabularStore>, master_id: String, ttl: Duration) -> Self {
        Self {
            store,
            master_id,
            cache: DashMap::new(),
            ttl,
        }
    }

    /// Login: scan every client partition for a row matching both username
    /// and password. The first match wins and no further partition is
    /// consulted. Always hits the store; a success refreshes the cache.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<CurrentUser> {
        match self.scan_partitions(username, Some(password)).await? {
            Some(user) => {
                self.cache_user(&user);
                Ok(user)
            }
            None => {
                tracing::warn!(username, "login rejected");
                Err(AppError::invalid_credentials())
            }
        }
    }

    /// Post-login resolution by username only, through the TTL cache.
    pub async fn resolve(&self, username: &str) -> AppResult<CurrentUser> {
        if let Some(entry) = self.cache.get(username)
            && entry.cached_at.elapsed() < self.ttl
        {
            return Ok(entry.user.clone());
        }
        self.cache.remove(username);

        match self.scan_partitions(username, None).await? {
            Some(user) => {
                self.cache_user(&user);
                Ok(user)
            }
            None => Err(AppError::user_not_found()),
        }
    }

    /// The branches visible to a user's client: every distinct branch named
    /// in the user's own credential partition.
    pub async fn client_branches(&self, user: &CurrentUser) -> AppResult<Vec<String>> {
        let rows = self
            .store
            .read_range(&self.master_id, &partition_range(&user.partition))
            .await?;

        let mut branches: Vec<String> = rows
            .iter()
            .map(|row| cell_text(cell_at(row, COL_BRANCH)))
            .filter(|b| !b.is_empty())
            .collect();
        branches.sort();
        branches.dedup();
        Ok(branches)
    }

    fn cache_user(&self, user: &CurrentUser) {
        self.cache.insert(
            user.username.clone(),
            CacheEntry {
                user: user.clone(),
                cached_at: Instant::now(),
            },
        );
    }

    async fn scan_partitions(
        &self,
        username: &str,
        password: Option<&str>,
    ) -> AppResult<Option<CurrentUser>> {
        let tabs = self.store.list_sheets(&self.master_id).await?;

        for tab in tabs {
            if RESERVED_PARTITIONS.contains(&tab.as_str()) {
                continue;
            }
            let rows = self
                .store
                .read_range(&self.master_id, &partition_range(&tab))
                .await?;

            for row in &rows {
                if cell_text(cell_at(row, COL_USERNAME)) != username {
                    continue;
                }
                if let Some(expected) = password
                    && cell_text(cell_at(row, COL_PASSWORD)) != expected
                {
                    continue;
                }

                // F2 of the matched partition points at the client's order
                // data store; a blank cell makes the whole partition unusable
                let budget_sheet_id =
                    cell_text(rows.first().map_or(&Cell::Null, |r| cell_at(r, COL_BUDGET_ID)));
                if budget_sheet_id.is_empty() {
                    return Err(AppError::missing_configuration(format!(
                        "partition '{tab}' has no budget sheet id in F2"
                    )));
                }

                return Ok(Some(CurrentUser {
                    username: username.to_string(),
                    branch: cell_text(cell_at(row, COL_BRANCH)),
                    restricted: flag(cell_at(row, COL_RESTRICTED)),
                    level: AccessLevel::parse(&cell_text(cell_at(row, COL_LEVEL))),
                    paper_mode: flag(cell_at(row, COL_PAPER_MODE)),
                    budget_sheet_id,
                    partition: tab,
                }));
            }
        }
        Ok(None)
    }
}

/// Credential rows of one partition: `A2:Z`.
fn partition_range(tab: &str) -> RangeSpec {
    RangeSpec::new(tab, 1, crate::store::FIRST_DATA_ROW, 26, None)
}

const CELL_NULL: Cell = Cell::Null;

fn cell_at(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&CELL_NULL)
}

fn flag(cell: &Cell) -> bool {
    match cell {
        Cell::Bool(b) => *b,
        _ => {
            let text = cell_text(cell);
            text.eq_ignore_ascii_case("true") || text == "1"
        }
    }
}
