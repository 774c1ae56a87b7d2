//! Concatenates cleaned modules into the standalone bundle.
//!
//! Output layout mirrors what the framework ships: a boxed usage banner, a
//! services preamble that declares the shared `UIFramework` table, each module
//! body under its own separator banner, and a literal trailer exporting the
//! modules plus the panel/card/grid/notification factory helpers. The trailer
//! is target-runtime Lua and is embedded verbatim.

use std::path::Path;
use tracing::info;

use crate::cleaner::read_module;
use crate::config::{BundleConfig, ModuleEntry, FRAMEWORK_VERSION};
use crate::error::Result;

/// Framework exports and factory helpers appended after the last module
pub const FRAMEWORK_TAIL: &str = include_str!("assets/framework_tail.lua");

const HEADER_TEMPLATE: &str = r#"--[[
    ╔═══════════════════════════════════════════════════════════════╗
    ║                     UIFramework for Roblox                     ║
    ║                      Standalone Build v1.0.0                   ║
    ║                                                                 ║
    ║  A modern, customizable UI Framework with Panel design         ║
    ║  Built for use with Roblox Executors                          ║
    ╚═══════════════════════════════════════════════════════════════╝

    Usage:

    local UIFramework = loadstring(game:HttpGet("YOUR_RAW_URL"))()

    -- Create Panel
    local panel = UIFramework.CreatePanel({
        Title = "My Panel"
    })

    -- Add tabs
    local settingsTab = panel:AddTab({
        Name = "Settings",
        Icon = "gear"
    })

    -- Add components
    UIFramework.Toggle.new({
        Text = "Enable Feature",
        Icon = "star",
        Value = true,
        Parent = settingsTab,
        OnChange = function(value)
            print("Toggle:", value)
        end
    })

    Components:
    - Container (Panel with sidebar)
    - Label, Input, Button, Toggle
    - Slider, Checkbox, Dropdown (Single/Multiple)
    - Tab Navigation

    Built: __BUILD_DATE__
]]

"#;

const SERVICES_TEMPLATE: &str = r#"-- Services
local Players = game:GetService("Players")
local TweenService = game:GetService("TweenService")
local UserInputService = game:GetService("UserInputService")

-- Main Framework Table
local UIFramework = {}
UIFramework.Version = "__VERSION__"
UIFramework.BuildDate = "__BUILD_DATE__"

"#;

const BANNER_RULE: &str =
    "-- ═══════════════════════════════════════════════════════════════";

/// Boxed banner comment plus usage notes at the top of the bundle
pub fn render_header(build_date: &str) -> String {
    HEADER_TEMPLATE.replace("__BUILD_DATE__", build_date)
}

/// Roblox service locals and the shared `UIFramework` table
pub fn render_services(build_date: &str) -> String {
    SERVICES_TEMPLATE
        .replace("__VERSION__", FRAMEWORK_VERSION)
        .replace("__BUILD_DATE__", build_date)
}

/// Separator banner naming the module that follows
pub fn module_banner(entry: &ModuleEntry) -> String {
    let kind = if entry.is_component() {
        "COMPONENT"
    } else {
        "MODULE"
    };
    format!(
        "\n{rule}\n-- {name} {kind}\n{rule}\n\n",
        rule = BANNER_RULE,
        name = entry.name.to_uppercase(),
    )
}

/// Generate the standalone bundle: header, services, every module in
/// configured order under its banner, then the framework trailer.
///
/// Fails without producing any output if a module is missing or unreadable.
pub fn assemble(config: &BundleConfig, root: &Path, build_date: &str) -> Result<String> {
    let mut output = render_header(build_date);
    output.push_str(&render_services(build_date));

    for (index, entry) in config.modules.iter().enumerate() {
        info!(
            step = index + 1,
            total = config.modules.len(),
            module = %entry.name,
            "Adding module"
        );
        let content = read_module(root, entry)?;
        output.push_str(&module_banner(entry));
        output.push_str(&content);
        output.push('\n');
    }

    output.push('\n');
    output.push_str(FRAMEWORK_TAIL);

    Ok(output)
}
