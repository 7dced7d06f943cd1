use crate::data::request::AssistRequestRepository;
use crate::model::request::{AssistRequest, RequestStatus};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};
use uuid::Uuid;

mod find_by_id;
mod find_by_thread_id;
mod find_daily_activity;
mod find_searching_by_user;
mod insert;
mod insert_thread;
