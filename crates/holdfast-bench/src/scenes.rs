/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub kind: SceneKind,
}

pub enum SceneKind {
    /// Stream the active window one chunk east per tick, starting at the
    /// given chunk column. Measures generation throughput: every tick
    /// loads one fresh column of chunks.
    Streaming { start_x: i32 },
    /// Update every hostile building in a generated window with a player
    /// parked inside each building's activation band. Measures controller
    /// and spawn-pool cost.
    Siege { window_x: i32 },
}

/// The standard suite. Streaming scenes start deeper east so later scenes
/// cross taller terrain with bigger buildings.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "stream-origin",
            kind: SceneKind::Streaming { start_x: 0 },
        },
        SceneConfig {
            name: "stream-mid",
            kind: SceneKind::Streaming { start_x: 60 },
        },
        SceneConfig {
            name: "stream-deep",
            kind: SceneKind::Streaming { start_x: 200 },
        },
        SceneConfig {
            name: "siege-near",
            kind: SceneKind::Siege { window_x: 10 },
        },
        SceneConfig {
            name: "siege-deep",
            kind: SceneKind::Siege { window_x: 120 },
        },
    ]
}
