//! Health questionnaire intake: catalogs, in-progress snapshots, validation,
//! report formatting and delivery to a Telegram chat.
//!
//! Data flows one way on submit: [`store`] yields the snapshot,
//! [`validation`] gates it, [`report`] renders it and [`telegram`] delivers it.

pub mod catalog;
pub mod config;
pub mod contact;
pub mod form;
pub mod i18n;
pub mod report;
pub mod store;
pub mod telegram;
pub mod validation;
