/*! Integration tests for Itemmap.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - batch_read: Tests for the batch-read coordinator and LoadResult
 * - batch_write: Tests for the batch-write coordinator and FailedBatch handling
 * - condition: Tests for condition merging
 * - mapper: Tests for the Mapper facade, table naming, and transformation
 * - save: Tests for the save protocol and its handler hooks
 * - scan: Tests for scan request construction
 * - store: Tests for the Store trait and the in-memory implementation
 */

mod helpers;
mod scan;
mod store;
