/**
 * This module contains all logic for fetching assets and turning generated
 * geometry into GPU buffers.
 *
 * Textures are fetched from `./assets/` natively and from `<origin>/assets/`
 * in the browser.
 */
pub mod mesh;
pub mod texture;
