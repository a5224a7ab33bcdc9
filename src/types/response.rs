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

use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// How well an item was recalled.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Again,
    Hard,
    Good,
    Easy,
}

impl Response {
    pub fn as_str(&self) -> &'static str {
        match self {
            Response::Again => "again",
            Response::Hard => "hard",
            Response::Good => "good",
            Response::Easy => "easy",
        }
    }

    pub fn is_failure(&self) -> bool {
        *self == Response::Again
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<u8> for Response {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Response::Again),
            2 => Ok(Response::Hard),
            3 => Ok(Response::Good),
            4 => Ok(Response::Easy),
            _ => fail(format!("Invalid response: {value}")),
        }
    }
}

impl TryFrom<String> for Response {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "again" => Ok(Response::Again),
            "hard" => Ok(Response::Hard),
            "good" => Ok(Response::Good),
            "easy" => Ok(Response::Easy),
            _ => fail(format!("Invalid response: {value}")),
        }
    }
}

impl ToSql for Response {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Response {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        Response::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
