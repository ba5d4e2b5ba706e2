//! Common types used throughout fitpage
//!
//! This module contains shared type definitions used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Resource Areas
// ============================================================================

/// A resource area of the remote fitness API
///
/// Each area is served by its own resource service, which exclusively owns
/// that area's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceArea {
    Activity,
    Athlete,
    Challenge,
    Club,
    ClubGroupEvent,
    Gear,
    Route,
    RunningRace,
    Segment,
    SegmentEffort,
    Stream,
    Token,
    Upload,
    WebhookSubscription,
}

impl ResourceArea {
    /// All resource areas, in declaration order
    pub const ALL: [ResourceArea; 14] = [
        ResourceArea::Activity,
        ResourceArea::Athlete,
        ResourceArea::Challenge,
        ResourceArea::Club,
        ResourceArea::ClubGroupEvent,
        ResourceArea::Gear,
        ResourceArea::Route,
        ResourceArea::RunningRace,
        ResourceArea::Segment,
        ResourceArea::SegmentEffort,
        ResourceArea::Stream,
        ResourceArea::Token,
        ResourceArea::Upload,
        ResourceArea::WebhookSubscription,
    ];

    /// Stable snake_case name of the area
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceArea::Activity => "activity",
            ResourceArea::Athlete => "athlete",
            ResourceArea::Challenge => "challenge",
            ResourceArea::Club => "club",
            ResourceArea::ClubGroupEvent => "club_group_event",
            ResourceArea::Gear => "gear",
            ResourceArea::Route => "route",
            ResourceArea::RunningRace => "running_race",
            ResourceArea::Segment => "segment",
            ResourceArea::SegmentEffort => "segment_effort",
            ResourceArea::Stream => "stream",
            ResourceArea::Token => "token",
            ResourceArea::Upload => "upload",
            ResourceArea::WebhookSubscription => "webhook_subscription",
        }
    }
}

impl fmt::Display for ResourceArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
