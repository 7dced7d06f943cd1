use crate::data::custom_bot::CustomBotRepository;
use crate::model::custom_bot::CreateCustomBotParams;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod find_by_user;
mod invalidate_by_token;
