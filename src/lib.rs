mod archive;
mod commands;
mod index;
mod store;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .invoke_handler(tauri::generate_handler![
            commands::refresh_shelf,
            commands::upload_item,
            commands::download_item,
            commands::delete_item,
            commands::download_archive
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
