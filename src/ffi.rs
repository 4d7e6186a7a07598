//! FFI bindings for Habitra Core
//!
//! C-compatible functions for embedding the engine in a mobile shell.
//! All functions use C strings (null-terminated) and return allocated memory
//! that must be freed by the caller using `habitra_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::date;
use crate::storage::{FileStorage, PersistedStore};
use crate::types::AddHabitPayload;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Opaque handle to a persisted habit store
pub struct HabitraStoreHandle {
    store: PersistedStore<FileStorage>,
}

/// Resolve an optional day argument: null means "today" (UTC boundary).
unsafe fn resolve_day(day: *const c_char) -> Result<Option<chrono::NaiveDate>, String> {
    if day.is_null() {
        return Ok(None);
    }
    let raw = match cstr_to_string(day) {
        Some(s) => s,
        None => return Err("Invalid day string pointer".to_string()),
    };
    match date::parse_day(&raw) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => Err(e.to_string()),
    }
}

/// Open (or create) a habit store persisted under `root_dir`.
///
/// Missing or unreadable persisted state falls back to the seed collection.
///
/// # Safety
/// - `root_dir` must be a valid null-terminated C string.
/// - Returns a pointer that must be freed with `habitra_store_free`.
/// - Returns NULL on error; call `habitra_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn habitra_store_open(root_dir: *const c_char) -> *mut HabitraStoreHandle {
    clear_last_error();

    let root = match cstr_to_string(root_dir) {
        Some(s) => s,
        None => {
            set_last_error("Invalid root_dir string pointer");
            return ptr::null_mut();
        }
    };

    let store = PersistedStore::open(FileStorage::new(root));
    Box::into_raw(Box::new(HabitraStoreHandle { store }))
}

/// Free a habit store handle.
///
/// # Safety
/// - `store` must be a valid pointer returned by `habitra_store_open`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn habitra_store_free(store: *mut HabitraStoreHandle) {
    if !store.is_null() {
        drop(Box::from_raw(store));
    }
}

/// Snapshot the ordered habit collection as a JSON array.
///
/// # Safety
/// - `store` must be a valid pointer returned by `habitra_store_open`.
/// - Returns a newly allocated string; free with `habitra_free_string`.
#[no_mangle]
pub unsafe extern "C" fn habitra_store_habits(store: *mut HabitraStoreHandle) -> *mut c_char {
    clear_last_error();

    if store.is_null() {
        set_last_error("Null store pointer");
        return ptr::null_mut();
    }
    let handle = &*store;

    match serde_json::to_string(handle.store.habits()) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Toggle a habit's completion for a day and return the transition as JSON.
///
/// Pass NULL for `day` to target today (UTC boundary). An unknown habit id
/// is a no-op: the function returns NULL and sets the last error, but the
/// store is unchanged.
///
/// # Safety
/// - `store` must be a valid pointer returned by `habitra_store_open`.
/// - `habit_id` must be a valid null-terminated C string; `day` may be NULL
///   or a valid `YYYY-MM-DD` C string.
/// - Returns a newly allocated string; free with `habitra_free_string`.
#[no_mangle]
pub unsafe extern "C" fn habitra_store_toggle(
    store: *mut HabitraStoreHandle,
    habit_id: *const c_char,
    day: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if store.is_null() {
        set_last_error("Null store pointer");
        return ptr::null_mut();
    }
    let handle = &mut *store;

    let id = match cstr_to_string(habit_id) {
        Some(s) => s,
        None => {
            set_last_error("Invalid habit_id string pointer");
            return ptr::null_mut();
        }
    };

    let day = match resolve_day(day) {
        Ok(day) => day,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    match handle.store.toggle_completion(&id, day) {
        Some(transition) => match serde_json::to_string(&transition) {
            Ok(json) => string_to_cstr(&json),
            Err(e) => {
                set_last_error(&e.to_string());
                ptr::null_mut()
            }
        },
        None => {
            set_last_error("Unknown habit id");
            ptr::null_mut()
        }
    }
}

/// Add a habit and return the new habit as JSON.
///
/// # Safety
/// - `store` must be a valid pointer returned by `habitra_store_open`.
/// - `title` and `color` must be valid null-terminated C strings.
/// - Returns a newly allocated string; free with `habitra_free_string`.
#[no_mangle]
pub unsafe extern "C" fn habitra_store_add(
    store: *mut HabitraStoreHandle,
    title: *const c_char,
    color: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if store.is_null() {
        set_last_error("Null store pointer");
        return ptr::null_mut();
    }
    let handle = &mut *store;

    let title = match cstr_to_string(title) {
        Some(s) => s,
        None => {
            set_last_error("Invalid title string pointer");
            return ptr::null_mut();
        }
    };

    let color = match cstr_to_string(color) {
        Some(s) => s,
        None => {
            set_last_error("Invalid color string pointer");
            return ptr::null_mut();
        }
    };

    let id = handle.store.add_habit(AddHabitPayload { title, color });
    let added = handle.store.store().habit(&id);

    match serde_json::to_string(&added) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Move a habit within the collection.
///
/// Returns true when the move happened. Negative, out-of-bounds, or equal
/// indices are a no-op returning false.
///
/// # Safety
/// - `store` must be a valid pointer returned by `habitra_store_open`.
#[no_mangle]
pub unsafe extern "C" fn habitra_store_reorder(
    store: *mut HabitraStoreHandle,
    from: i32,
    to: i32,
) -> bool {
    clear_last_error();

    if store.is_null() {
        set_last_error("Null store pointer");
        return false;
    }
    let handle = &mut *store;

    if from < 0 || to < 0 {
        return false;
    }
    handle.store.reorder_habits(from as usize, to as usize)
}

/// Replace the collection with the default seed set.
///
/// # Safety
/// - `store` must be a valid pointer returned by `habitra_store_open`.
#[no_mangle]
pub unsafe extern "C" fn habitra_store_reset(store: *mut HabitraStoreHandle) {
    clear_last_error();

    if store.is_null() {
        set_last_error("Null store pointer");
        return;
    }
    let handle = &mut *store;
    handle.store.reset();
}

/// Daily progress for a day as JSON (`{completed, total, percent}`).
///
/// Pass NULL for `day` to target today (UTC boundary).
///
/// # Safety
/// - `store` must be a valid pointer returned by `habitra_store_open`.
/// - `day` may be NULL or a valid `YYYY-MM-DD` C string.
/// - Returns a newly allocated string; free with `habitra_free_string`.
#[no_mangle]
pub unsafe extern "C" fn habitra_store_progress(
    store: *mut HabitraStoreHandle,
    day: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if store.is_null() {
        set_last_error("Null store pointer");
        return ptr::null_mut();
    }
    let handle = &*store;

    let day = match resolve_day(day) {
        Ok(day) => day,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    match serde_json::to_string(&handle.store.daily_progress(day)) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a string allocated by this library.
///
/// # Safety
/// - `ptr` must be a pointer returned by a `habitra_*` function, or NULL.
#[no_mangle]
pub unsafe extern "C" fn habitra_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the last error message, or NULL when there is none.
///
/// # Safety
/// - The returned pointer is valid until the next `habitra_*` call on this
///   thread and must not be freed.
#[no_mangle]
pub unsafe extern "C" fn habitra_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(err) => err.as_ptr(),
        None => ptr::null(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn cstring(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    unsafe fn read_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let out = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        habitra_free_string(ptr);
        out
    }

    #[test]
    fn test_ffi_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let root = cstring(dir.path().to_str().unwrap());

        unsafe {
            let store = habitra_store_open(root.as_ptr());
            assert!(!store.is_null());

            // Seed collection is present.
            let habits_json = read_string(habitra_store_habits(store));
            let habits: serde_json::Value = serde_json::from_str(&habits_json).unwrap();
            assert_eq!(habits.as_array().unwrap().len(), 4);
            assert_eq!(habits[0]["id"], "morning-stretch");

            // Toggle today on the first seed habit.
            let id = cstring("drink-water");
            let transition_json =
                read_string(habitra_store_toggle(store, id.as_ptr(), ptr::null()));
            let transition: serde_json::Value = serde_json::from_str(&transition_json).unwrap();
            assert_eq!(transition["habitId"], "drink-water");
            assert_eq!(transition["isCompleted"], true);

            habitra_store_free(store);
        }
    }

    #[test]
    fn test_ffi_unknown_habit_sets_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = cstring(dir.path().to_str().unwrap());

        unsafe {
            let store = habitra_store_open(root.as_ptr());
            let id = cstring("nope");
            let result = habitra_store_toggle(store, id.as_ptr(), ptr::null());
            assert!(result.is_null());

            let error = habitra_last_error();
            assert!(!error.is_null());
            assert_eq!(CStr::from_ptr(error).to_str().unwrap(), "Unknown habit id");

            habitra_store_free(store);
        }
    }

    #[test]
    fn test_ffi_negative_reorder_is_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let root = cstring(dir.path().to_str().unwrap());

        unsafe {
            let store = habitra_store_open(root.as_ptr());
            assert!(!habitra_store_reorder(store, -1, 0));
            assert!(!habitra_store_reorder(store, 0, 0));
            assert!(habitra_store_reorder(store, 0, 1));
            habitra_store_free(store);
        }
    }

    #[test]
    fn test_ffi_progress_with_explicit_day() {
        let dir = tempfile::tempdir().unwrap();
        let root = cstring(dir.path().to_str().unwrap());

        unsafe {
            let store = habitra_store_open(root.as_ptr());
            let day = cstring("1999-01-01");
            let progress_json = read_string(habitra_store_progress(store, day.as_ptr()));
            let progress: serde_json::Value = serde_json::from_str(&progress_json).unwrap();
            assert_eq!(progress["completed"], 0);
            assert_eq!(progress["total"], 4);
            assert_eq!(progress["percent"], 0.0);

            let bad_day = cstring("not-a-day");
            assert!(habitra_store_progress(store, bad_day.as_ptr()).is_null());
            assert!(!habitra_last_error().is_null());

            habitra_store_free(store);
        }
    }
}
