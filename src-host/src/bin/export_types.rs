// Binary to export TypeScript types
// Run with: cargo run --bin export_types

use ts_rs::TS;

fn main() {
    println!("Exporting TypeScript types...");

    unzipper_lib::commands::ExtractRequestDTO::export()
        .expect("Failed to export ExtractRequestDTO");
    unzipper_lib::commands::ExtractResponse::export().expect("Failed to export ExtractResponse");
    unzipper_lib::commands::ProgressEvent::export().expect("Failed to export ProgressEvent");
    unzipper_lib::commands::JobSummary::export().expect("Failed to export JobSummary");
    unzipper_lib::settings::SettingsData::export().expect("Failed to export SettingsData");

    extractor::ExtractStats::export().expect("Failed to export ExtractStats");
    extractor::ExtractReport::export().expect("Failed to export ExtractReport");

    println!("✓ TypeScript types exported successfully to bindings/");
}
