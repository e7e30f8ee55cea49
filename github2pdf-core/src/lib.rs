#![doc = "github2pdf-core: core logic library for github2pdf."]

//! This crate contains the whole fetch-filter-render pipeline:
//! download a repository archive, keep the files worth reading, and lay them
//! out into one PDF. The CLI crate only parses arguments and wires these together.
//!
//! # Usage
//! Build a [`config::RunConfig`], call [`download::fetch_repository`] with a
//! [`contract::Downloader`], then [`code_to_pdf::write_pdf`], or let
//! [`pipeline::build_pdf`] do all of it.

pub mod archive;
pub mod code_to_pdf;
pub mod config;
pub mod contract;
pub mod download;
pub mod filter;
pub mod pipeline;
