//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep most of them `false` so release
//! builds remain quiet.

pub struct DebugFlags {
    /// Emit UI interaction logs (tab switches, level edits, snapshot actions).
    pub print_ui_interactions: bool,
    /// Emit cache/API provider decisions during startup data loading.
    pub print_data_loading: bool,
    /// Emit the raw candidate sets while computing levels.
    pub print_level_math: bool,
    /// Emit detailed serialization/deserialization logs.
    pub print_serde: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_ui_interactions: true,
    print_data_loading: false,
    print_level_math: false,
    print_serde: false,
};
