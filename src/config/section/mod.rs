//! Configuration section definitions.
//!
//! | Section   | Purpose                                         |
//! |-----------|-------------------------------------------------|
//! | `[site]`  | Site title, url and base url                    |
//! | `[i18n]`  | Languages and localization behavior             |
//! | `[build]` | Source/destination paths, include/exclude lists |

mod build;
mod i18n;
mod site;

pub use build::BuildSectionConfig;
pub use i18n::I18nConfig;
pub use site::SiteSectionConfig;
