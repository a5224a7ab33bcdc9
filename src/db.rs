// Copyright 2026 The recall Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;

use chrono::TimeDelta;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::date::Date;
use crate::types::item_id::ItemId;
use crate::types::item_kind::ItemKind;
use crate::types::response::Response;
use crate::types::schedule::Ease;
use crate::types::schedule::ScheduleRecord;
use crate::types::timestamp::Timestamp;

/// The name of the item store at the collection root.
pub const DATABASE_FILE: &str = "recall.db";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Allocate a fresh identity.
    pub fn insert_item(&mut self, kind: ItemKind, added_at: Timestamp) -> Fallible<ItemId> {
        let sql = "insert into items (kind, added_at) values (?, ?) returning item_id;";
        let item_id: ItemId = self
            .conn
            .query_row(sql, (kind, added_at), |row| row.get(0))?;
        log::debug!("Allocated {kind} item {item_id}.");
        Ok(item_id)
    }

    /// The kind of an item. An identity with no item is an error.
    pub fn item_kind(&self, item_id: ItemId) -> Fallible<ItemKind> {
        let sql = "select kind from items where item_id = ?;";
        let kind: Option<ItemKind> = self
            .conn
            .query_row(sql, [item_id], |row| row.get(0))
            .optional()?;
        match kind {
            Some(kind) => Ok(kind),
            None => fail(format!("no item with identity {item_id}.")),
        }
    }

    /// The current schedule of an item, with the delay measured up to
    /// `today`. `None` if the item was never scheduled.
    pub fn get_schedule(&self, item_id: ItemId, today: Date) -> Fallible<Option<ScheduleRecord>> {
        self.item_kind(item_id)?;
        let sql = "select due_date, interval, ease from schedules where item_id = ?;";
        let row: Option<(Date, f64, Ease)> = self
            .conn
            .query_row(sql, [item_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .optional()?;
        Ok(row.map(|(due_date, interval, ease)| schedule_record(due_date, interval, ease, today)))
    }

    /// Replace an item's schedule without recording a review.
    pub fn set_schedule(&mut self, item_id: ItemId, schedule: &ScheduleRecord) -> Fallible<()> {
        self.item_kind(item_id)?;
        let tx = self.conn.transaction()?;
        upsert_schedule(&tx, item_id, schedule, 0)?;
        tx.commit()?;
        Ok(())
    }

    /// Log a review and store its resulting schedule.
    pub fn record_review(&mut self, review: &Review) -> Fallible<()> {
        self.item_kind(review.item_id)?;
        let tx = self.conn.transaction()?;
        let sql = "insert into reviews (item_id, reviewed_at, response, due_date, interval, ease, was_new) values (?, ?, ?, ?, ?, ?, ?);";
        tx.execute(
            sql,
            (
                review.item_id,
                review.reviewed_at,
                review.response,
                review.schedule.due_date,
                review.schedule.interval,
                review.schedule.ease,
                review.was_new,
            ),
        )?;
        upsert_schedule(&tx, review.item_id, &review.schedule, 1)?;
        tx.commit()?;
        Ok(())
    }

    /// Every item, with its schedule if it has one.
    pub fn items(&self, today: Date) -> Fallible<Vec<ItemRow>> {
        let sql = "select i.item_id, i.kind, s.due_date, s.interval, s.ease, coalesce(s.review_count, 0) from items i left outer join schedules s on s.item_id = i.item_id order by i.item_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let due_date: Option<Date> = row.get(2)?;
            let interval: Option<f64> = row.get(3)?;
            let ease: Option<Ease> = row.get(4)?;
            let schedule = match (due_date, interval, ease) {
                (Some(due_date), Some(interval), Some(ease)) => {
                    Some(schedule_record(due_date, interval, ease, today))
                }
                _ => None,
            };
            items.push(ItemRow {
                item_id: row.get(0)?,
                kind: row.get(1)?,
                schedule,
                review_count: row.get(5)?,
            });
        }
        Ok(items)
    }

    /// Every item, keyed by identity.
    pub fn items_by_id(&self, today: Date) -> Fallible<HashMap<ItemId, ItemRow>> {
        let items = self.items(today)?;
        Ok(items.into_iter().map(|row| (row.item_id, row)).collect())
    }

    /// How many items were reviewed today, split into those that were due
    /// and those that were new.
    pub fn today_review_counts(&self, today: Date) -> Fallible<ReviewCounts> {
        let mut stmt = self.conn.prepare("select reviewed_at, was_new from reviews;")?;
        let mut rows = stmt.query([])?;
        let mut counts = ReviewCounts::default();
        while let Some(row) = rows.next()? {
            let reviewed_at: Timestamp = row.get(0)?;
            let was_new: bool = row.get(1)?;
            if reviewed_at.local_date() == today {
                if was_new {
                    counts.new += 1;
                } else {
                    counts.due += 1;
                }
            }
        }
        Ok(counts)
    }
}

pub struct Review {
    pub item_id: ItemId,
    pub reviewed_at: Timestamp,
    pub response: Response,
    pub schedule: ScheduleRecord,
    pub was_new: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemRow {
    pub item_id: ItemId,
    pub kind: ItemKind,
    pub schedule: Option<ScheduleRecord>,
    pub review_count: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ReviewCounts {
    pub due: usize,
    pub new: usize,
}

fn schedule_record(due_date: Date, interval: f64, ease: Ease, today: Date) -> ScheduleRecord {
    let delay = TimeDelta::days(today.days_since(due_date));
    ScheduleRecord::new(due_date, interval, ease, delay)
}

fn upsert_schedule(
    tx: &Transaction,
    item_id: ItemId,
    schedule: &ScheduleRecord,
    reviews: i64,
) -> Fallible<()> {
    let sql = "insert into schedules (item_id, due_date, interval, ease, review_count) values (?, ?, ?, ?, ?) on conflict (item_id) do update set due_date = excluded.due_date, interval = excluded.interval, ease = excluded.ease, review_count = review_count + excluded.review_count;";
    tx.execute(
        sql,
        (
            item_id,
            schedule.due_date,
            schedule.interval,
            schedule.ease,
            reviews,
        ),
    )?;
    Ok(())
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["items"], |row| row.get(0))?;
    Ok(count > 0)
}
