use crate::models::attendance::AttendanceStatus;
use crate::tracking::weekday::{parse_weekday, weekday_name};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveTime, Weekday};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// WAL operation types
///
/// Free-text fields are hex encoded so a `|` typed into a form can never
/// split a line.
#[derive(Debug, Clone, PartialEq)]
pub enum WalOperation {
    AddUser {
        id: u32,
        username: String,
        password_hash: String,
    },
    AddSlot {
        id: u32,
        user_id: u32,
        subject: String,
        day: Weekday,
        time: NaiveTime,
    },
    RecordAttendance {
        id: u32,
        user_id: u32,
        date: NaiveDate,
        status: AttendanceStatus,
    },
}

impl WalOperation {
    fn to_line(&self) -> String {
        match self {
            WalOperation::AddUser {
                id,
                username,
                password_hash,
            } => format!(
                "ADD_USER|{}|{}|{}",
                id,
                hex::encode(username),
                hex::encode(password_hash)
            ),
            WalOperation::AddSlot {
                id,
                user_id,
                subject,
                day,
                time,
            } => format!(
                "ADD_SLOT|{}|{}|{}|{}|{}",
                id,
                user_id,
                hex::encode(subject),
                weekday_name(*day),
                time.format("%H:%M")
            ),
            WalOperation::RecordAttendance {
                id,
                user_id,
                date,
                status,
            } => format!(
                "RECORD_ATTENDANCE|{}|{}|{}|{}",
                id,
                user_id,
                date.format("%Y-%m-%d"),
                status
            ),
        }
    }

    fn from_line(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split('|').collect();

        match parts.first() {
            Some(&"ADD_USER") => {
                if parts.len() != 4 {
                    bail!("Invalid ADD_USER format");
                }
                let id = parts[1].parse::<u32>().context("Invalid user ID")?;
                let username = decode_text(parts[2]).context("Invalid username hex")?;
                let password_hash = decode_text(parts[3]).context("Invalid password hash hex")?;

                Ok(WalOperation::AddUser {
                    id,
                    username,
                    password_hash,
                })
            }
            Some(&"ADD_SLOT") => {
                if parts.len() != 6 {
                    bail!("Invalid ADD_SLOT format");
                }
                let id = parts[1].parse::<u32>().context("Invalid slot ID")?;
                let user_id = parts[2].parse::<u32>().context("Invalid user ID")?;
                let subject = decode_text(parts[3]).context("Invalid subject hex")?;
                let day = parse_weekday(parts[4])
                    .ok_or_else(|| anyhow!("Invalid weekday '{}'", parts[4]))?;
                let time = NaiveTime::parse_from_str(parts[5], "%H:%M").context("Invalid slot time")?;

                Ok(WalOperation::AddSlot {
                    id,
                    user_id,
                    subject,
                    day,
                    time,
                })
            }
            Some(&"RECORD_ATTENDANCE") => {
                if parts.len() != 5 {
                    bail!("Invalid RECORD_ATTENDANCE format");
                }
                let id = parts[1].parse::<u32>().context("Invalid attendance ID")?;
                let user_id = parts[2].parse::<u32>().context("Invalid user ID")?;
                let date = NaiveDate::parse_from_str(parts[3], "%Y-%m-%d").context("Invalid date")?;
                let status = parts[4]
                    .parse::<AttendanceStatus>()
                    .map_err(|s| anyhow!("Invalid attendance status '{}'", s))?;

                Ok(WalOperation::RecordAttendance {
                    id,
                    user_id,
                    date,
                    status,
                })
            }
            _ => bail!("Unknown operation type"),
        }
    }
}

fn decode_text(field: &str) -> Result<String> {
    let bytes = hex::decode(field)?;
    String::from_utf8(bytes).context("Field is not valid UTF-8")
}

pub struct Wal {
    file: Arc<Mutex<File>>,
    path: PathBuf,
}

impl Wal {
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open WAL file")?;

        Ok(Wal {
            file: Arc::new(Mutex::new(file)),
            path,
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn log_operation(&self, op: &WalOperation) -> Result<()> {
        let line = op.to_line();
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow!("WAL file lock poisoned"))?;
        writeln!(file, "{}", line).context("Failed to write to WAL")?;
        file.flush().context("Failed to flush WAL")?;
        file.sync_data().context("Failed to sync WAL to disk")?;
        Ok(())
    }

    pub fn replay(&self) -> Result<Vec<WalOperation>> {
        let file = File::open(&self.path).context("Failed to open WAL for replay")?;
        let reader = BufReader::new(file);
        let mut operations = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from WAL")?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match WalOperation::from_line(line) {
                Ok(op) => operations.push(op),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse WAL line, skipping"
                    );
                }
            }
        }

        Ok(operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn nine() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    #[test]
    fn test_wal_line_format() {
        let op = WalOperation::AddSlot {
            id: 3,
            user_id: 1,
            subject: "Math".to_string(),
            day: Weekday::Mon,
            time: nine(),
        };
        assert_eq!(op.to_line(), format!("ADD_SLOT|3|1|{}|Monday|09:00", hex::encode("Math")));

        let op = WalOperation::RecordAttendance {
            id: 7,
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: AttendanceStatus::Absent,
        };
        assert_eq!(op.to_line(), "RECORD_ATTENDANCE|7|1|2024-01-01|absent");
    }

    #[test]
    fn test_free_text_with_separator_survives() {
        let op = WalOperation::AddUser {
            id: 1,
            username: "a|b".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        };
        let parsed = WalOperation::from_line(&op.to_line()).unwrap();
        assert_eq!(parsed, op);
    }

    #[test]
    fn test_wal_log_and_replay() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        let wal = Wal::new(wal_path).unwrap();

        wal.log_operation(&WalOperation::AddUser {
            id: 1,
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
        })
        .unwrap();

        wal.log_operation(&WalOperation::AddSlot {
            id: 1,
            user_id: 1,
            subject: "Physics".to_string(),
            day: Weekday::Fri,
            time: nine(),
        })
        .unwrap();

        wal.log_operation(&WalOperation::RecordAttendance {
            id: 1,
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            status: AttendanceStatus::Present,
        })
        .unwrap();

        let operations = wal.replay().unwrap();
        assert_eq!(operations.len(), 3);

        match &operations[1] {
            WalOperation::AddSlot {
                subject, day, time, ..
            } => {
                assert_eq!(subject, "Physics");
                assert_eq!(*day, Weekday::Fri);
                assert_eq!(*time, nine());
            }
            _ => panic!("Expected AddSlot"),
        }

        match &operations[2] {
            WalOperation::RecordAttendance { status, .. } => {
                assert_eq!(*status, AttendanceStatus::Present);
            }
            _ => panic!("Expected RecordAttendance"),
        }
    }

    #[test]
    fn test_wal_invalid_lines() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        fs::write(
            &wal_path,
            "INVALID_OP|data\nRECORD_ATTENDANCE|1|1|2024-13-40|present\nRECORD_ATTENDANCE|2|1|2024-01-02|absent\n",
        )
        .unwrap();

        let wal = Wal::new(wal_path).unwrap();
        let operations = wal.replay().unwrap();

        assert_eq!(operations.len(), 1);
    }
}
