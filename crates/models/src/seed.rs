//! Default corpus written on first start: the copy of the public page, the
//! three flagship services and the contact coordinates.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set};

use crate::{content_block, service_entry, setting};

pub const BLOCKS: &[(&str, &str)] = &[
    ("hero.title", "Zarvis"),
    ("hero.subtitle", "Ultra-Luxury International Trade Artisans"),
    ("hero.cta", "Engage the Command Console"),
    ("narrative.section1.title", "Precision in Every Movement"),
    ("narrative.section1.body", "From Geneva to Singapore, our trade frameworks operate with the discretion of a Swiss private bank and the elegance of Parisian haute couture."),
    ("narrative.section2.title", "An Orchestra of Trusted Partners"),
    ("narrative.section2.body", "Our network weaves together artisans, financiers, and logistics commanders to choreograph bespoke trade experiences."),
    ("narrative.section3.title", "Uncompromised Security"),
    ("narrative.section3.body", "Every interaction is protected by multi-layer protocols engineered for sovereign-level confidentiality."),
    ("experience.callout", "We design, execute, and safeguard the critical trade missions of the world’s most discerning clientele."),
    ("approach.title", "Our Command Philosophy"),
    ("approach.pillar1.title", "Strategic Reconnaissance"),
    ("approach.pillar1.body", "We invest deeply in understanding cultural, regulatory, and logistical terrain before recommending a single move."),
    ("approach.pillar2.title", "Orchestrated Precision"),
    ("approach.pillar2.body", "Every operation is choreographed with a secure command console that synchs partners, routes, and contingencies in real time."),
    ("approach.pillar3.title", "Enduring Stewardship"),
    ("approach.pillar3.body", "Beyond delivery, we remain embedded. Monitoring assets, refining circuitry, and ensuring each mission continues to perform flawlessly."),
    ("contact.title", "Command Console Access"),
    ("contact.subtitle", "Initiate a secure briefing to align with the Zarvis command echelon."),
    ("contact.form.header", "Request a confidential engagement"),
    ("footer.tagline", "Zarvis · International Trade Orchestration"),
    ("admin.welcome", "Welcome to the Zarvis Command Console"),
    ("admin.subtitle", "Adjust narratives, services, and contact coordinates with precision."),
];

/// `(title, description, emphasis, order_index)`
pub const SERVICES: &[(&str, &str, &str, i32)] = &[
    (
        "Sovereign Trade Architecture",
        "Multi-jurisdictional trade structures designed to maximize discretion, compliance, and fiscal efficiency across continents.",
        "Engineered for governments, royal households, and category-defining conglomerates.",
        1,
    ),
    (
        "Bespoke Asset Logistics",
        "From haute horlogerie to rare earth payloads, we choreograph end-to-end logistics with air-gapped tracking and adaptive security escorts.",
        "Zero compromise transit with real-time telemetry and contingency orchestration.",
        2,
    ),
    (
        "Strategic Procurement Intelligence",
        "We embed intelligence cells within procurement channels, ensuring acquisition strategies align with cultural nuance and market cadence.",
        "Synthesizing human insight with advanced analytics to surface hidden opportunities.",
        3,
    ),
];

pub const SETTINGS: &[(&str, &str)] = &[
    ("contact.email", "command@zarvis.global"),
    ("contact.phone", "+41 22 555 0199"),
    ("contact.address", "Rue du Rhône 25, 1204 Genève"),
    ("contact.schedule", "By private appointment only"),
];

/// Insert the whole corpus through `conn`. Callers wrap this in a transaction.
pub async fn insert_defaults<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let now = Utc::now();

    let blocks = BLOCKS.iter().map(|(key, value)| content_block::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
        kind: Set(content_block::DEFAULT_KIND.to_string()),
        updated_at: Set(now),
    });
    content_block::Entity::insert_many(blocks).exec_without_returning(conn).await?;

    let services = SERVICES.iter().map(|(title, description, emphasis, order_index)| {
        service_entry::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            emphasis: Set(emphasis.to_string()),
            order_index: Set(*order_index),
            ..Default::default()
        }
    });
    service_entry::Entity::insert_many(services).exec_without_returning(conn).await?;

    let settings = SETTINGS.iter().map(|(key, value)| setting::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
    });
    setting::Entity::insert_many(settings).exec_without_returning(conn).await?;

    Ok(())
}
