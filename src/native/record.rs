//! Fixed-layout initialization record and its owning handle.

use std::mem;
use std::os::raw::c_int;
use std::ptr;
use tracing::{debug, trace};

use crate::config::SettingsRecord;
use crate::native::NativeString;
use crate::settings::{LogItems, LogSeverity};

/// Initialization record with the `cef_settings_t` field order and types.
///
/// Booleans are `c_int` 0/1, strings are [`NativeString`], colors are
/// `cef_color_t`, the severity is `cef_log_severity_t` and the log items are
/// `cef_log_items_t`. `size` carries the struct size so the engine can detect
/// version skew. `disable_signal_handlers` exists on POSIX targets other than
/// Android only, as in the C header.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct NativeSettingsRecord {
    pub size: usize,
    pub no_sandbox: c_int,
    pub browser_subprocess_path: NativeString,
    pub framework_dir_path: NativeString,
    pub main_bundle_path: NativeString,
    pub multi_threaded_message_loop: c_int,
    pub external_message_pump: c_int,
    pub windowless_rendering_enabled: c_int,
    pub command_line_args_disabled: c_int,
    pub cache_path: NativeString,
    pub root_cache_path: NativeString,
    pub persist_session_cookies: c_int,
    pub user_agent: NativeString,
    pub user_agent_product: NativeString,
    pub locale: NativeString,
    pub log_file: NativeString,
    pub log_severity: c_int,
    pub log_items: c_int,
    pub javascript_flags: NativeString,
    pub resources_dir_path: NativeString,
    pub locales_dir_path: NativeString,
    pub remote_debugging_port: c_int,
    pub uncaught_exception_stack_size: c_int,
    pub background_color: u32,
    pub accept_language_list: NativeString,
    pub cookieable_schemes_list: NativeString,
    pub cookieable_schemes_exclude_defaults: c_int,
    pub chrome_policy_id: NativeString,
    pub chrome_app_icon_id: c_int,
    #[cfg(all(unix, not(target_os = "android")))]
    pub disable_signal_handlers: c_int,
}

impl Default for NativeSettingsRecord {
    /// All-zero record, as the engine's own `Settings::default()` produces.
    fn default() -> Self {
        Self {
            size: mem::size_of::<Self>(),
            no_sandbox: 0,
            browser_subprocess_path: NativeString::empty(),
            framework_dir_path: NativeString::empty(),
            main_bundle_path: NativeString::empty(),
            multi_threaded_message_loop: 0,
            external_message_pump: 0,
            windowless_rendering_enabled: 0,
            command_line_args_disabled: 0,
            cache_path: NativeString::empty(),
            root_cache_path: NativeString::empty(),
            persist_session_cookies: 0,
            user_agent: NativeString::empty(),
            user_agent_product: NativeString::empty(),
            locale: NativeString::empty(),
            log_file: NativeString::empty(),
            log_severity: LogSeverity::Default.as_raw(),
            log_items: LogItems::DEFAULT.bits(),
            javascript_flags: NativeString::empty(),
            resources_dir_path: NativeString::empty(),
            locales_dir_path: NativeString::empty(),
            remote_debugging_port: 0,
            uncaught_exception_stack_size: 0,
            background_color: 0,
            accept_language_list: NativeString::empty(),
            cookieable_schemes_list: NativeString::empty(),
            cookieable_schemes_exclude_defaults: 0,
            chrome_policy_id: NativeString::empty(),
            chrome_app_icon_id: 0,
            #[cfg(all(unix, not(target_os = "android")))]
            disable_signal_handlers: 0,
        }
    }
}

/// Encodes a bool as the engine's 0/1 integer.
pub(crate) fn to_c_bool(value: bool) -> c_int {
    c_int::from(value)
}

/// Any non-zero value reads as true.
pub(crate) fn from_c_bool(value: c_int) -> bool {
    value != 0
}

impl NativeSettingsRecord {
    /// Encodes a value record into the native layout.
    pub fn from_record(record: &SettingsRecord) -> Self {
        Self {
            size: mem::size_of::<Self>(),
            no_sandbox: to_c_bool(record.no_sandbox),
            browser_subprocess_path: NativeString::new(&record.browser_subprocess_path),
            framework_dir_path: NativeString::new(&record.framework_dir_path),
            main_bundle_path: NativeString::new(&record.main_bundle_path),
            multi_threaded_message_loop: to_c_bool(record.multi_threaded_message_loop),
            external_message_pump: to_c_bool(record.external_message_pump),
            windowless_rendering_enabled: to_c_bool(record.windowless_rendering_enabled),
            command_line_args_disabled: to_c_bool(record.command_line_args_disabled),
            cache_path: NativeString::new(&record.cache_path),
            root_cache_path: NativeString::new(&record.root_cache_path),
            persist_session_cookies: to_c_bool(record.persist_session_cookies),
            user_agent: NativeString::new(&record.user_agent),
            user_agent_product: NativeString::new(&record.user_agent_product),
            locale: NativeString::new(&record.locale),
            log_file: NativeString::new(&record.log_file),
            log_severity: record.log_severity.as_raw(),
            log_items: record.log_items.bits(),
            javascript_flags: NativeString::new(&record.javascript_flags),
            resources_dir_path: NativeString::new(&record.resources_dir_path),
            locales_dir_path: NativeString::new(&record.locales_dir_path),
            remote_debugging_port: record.remote_debugging_port,
            uncaught_exception_stack_size: record.uncaught_exception_stack_size,
            background_color: record.background_color,
            accept_language_list: NativeString::new(&record.accept_language_list),
            cookieable_schemes_list: NativeString::new(&record.cookieable_schemes_list),
            cookieable_schemes_exclude_defaults: to_c_bool(
                record.cookieable_schemes_exclude_defaults,
            ),
            chrome_policy_id: NativeString::new(&record.chrome_policy_id),
            chrome_app_icon_id: record.chrome_app_icon_id,
            #[cfg(all(unix, not(target_os = "android")))]
            disable_signal_handlers: to_c_bool(record.disable_signal_handlers),
        }
    }

    /// Decodes the native layout into a value record.
    ///
    /// A severity the engine does not define decodes as [`LogSeverity::Default`].
    /// Where the native record has no `disable_signal_handlers`, it decodes as `false`.
    pub fn to_record(&self) -> SettingsRecord {
        SettingsRecord {
            command_line_args_disabled: from_c_bool(self.command_line_args_disabled),
            external_message_pump: from_c_bool(self.external_message_pump),
            multi_threaded_message_loop: from_c_bool(self.multi_threaded_message_loop),
            windowless_rendering_enabled: from_c_bool(self.windowless_rendering_enabled),
            persist_session_cookies: from_c_bool(self.persist_session_cookies),
            cookieable_schemes_exclude_defaults: from_c_bool(
                self.cookieable_schemes_exclude_defaults,
            ),
            no_sandbox: from_c_bool(self.no_sandbox),
            browser_subprocess_path: self.browser_subprocess_path.decode(),
            framework_dir_path: self.framework_dir_path.decode(),
            main_bundle_path: self.main_bundle_path.decode(),
            cache_path: self.cache_path.decode(),
            root_cache_path: self.root_cache_path.decode(),
            locale: self.locale.decode(),
            locales_dir_path: self.locales_dir_path.decode(),
            resources_dir_path: self.resources_dir_path.decode(),
            log_file: self.log_file.decode(),
            log_severity: LogSeverity::from_raw(self.log_severity).unwrap_or_default(),
            log_items: LogItems(self.log_items),
            javascript_flags: self.javascript_flags.decode(),
            user_agent_product: self.user_agent_product.decode(),
            user_agent: self.user_agent.decode(),
            accept_language_list: self.accept_language_list.decode(),
            cookieable_schemes_list: self.cookieable_schemes_list.decode(),
            remote_debugging_port: self.remote_debugging_port,
            uncaught_exception_stack_size: self.uncaught_exception_stack_size,
            background_color: self.background_color,
            chrome_policy_id: self.chrome_policy_id.decode(),
            chrome_app_icon_id: self.chrome_app_icon_id,
            #[cfg(all(unix, not(target_os = "android")))]
            disable_signal_handlers: from_c_bool(self.disable_signal_handlers),
            #[cfg(not(all(unix, not(target_os = "android"))))]
            disable_signal_handlers: false,
        }
    }
}

/// Exclusive owner of a heap-allocated [`NativeSettingsRecord`].
///
/// The record is released by [`release`](Self::release) or, failing that, on
/// drop. `None` is the released sentinel, so a second release is a no-op.
#[derive(Debug)]
pub struct NativeSettingsHandle {
    record: Option<Box<NativeSettingsRecord>>,
}

impl NativeSettingsHandle {
    /// Moves `record` to the heap and takes ownership of it.
    pub fn allocate(record: NativeSettingsRecord) -> Self {
        let record = Box::new(record);
        debug!(
            address = ?(&*record as *const NativeSettingsRecord),
            size = record.size,
            "native settings record allocated"
        );
        Self {
            record: Some(record),
        }
    }

    pub fn get(&self) -> Option<&NativeSettingsRecord> {
        self.record.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut NativeSettingsRecord> {
        self.record.as_deref_mut()
    }

    /// Address of the record, usable as a `cef_settings_t*`; null once released.
    pub fn as_ptr(&self) -> *const NativeSettingsRecord {
        self.record
            .as_deref()
            .map_or(ptr::null(), |record| record as *const NativeSettingsRecord)
    }

    pub fn is_released(&self) -> bool {
        self.record.is_none()
    }

    /// Frees the record. Returns `true` only for the call that actually released it.
    pub fn release(&mut self) -> bool {
        match self.record.take() {
            Some(record) => {
                debug!(
                    address = ?(&*record as *const NativeSettingsRecord),
                    "native settings record released"
                );
                drop(record);
                true
            }
            None => false,
        }
    }
}

impl Drop for NativeSettingsHandle {
    fn drop(&mut self) {
        if self.release() {
            trace!("native settings record released on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_zeroed() {
        let record = NativeSettingsRecord::default();
        assert_eq!(record.size, mem::size_of::<NativeSettingsRecord>());
        assert_eq!(record.multi_threaded_message_loop, 0);
        assert!(record.cache_path.is_empty());
        assert_eq!(record.log_severity, 0);
    }

    #[test]
    fn test_record_conversion_round_trip() {
        let mut record = SettingsRecord::default()
            .with_cache_path("/var/cache/app")
            .with_locale("pt-BR")
            .with_log_severity(LogSeverity::Fatal)
            .with_background_color(0x80AB_CDEF);
        record.uncaught_exception_stack_size = -3;
        record.persist_session_cookies = true;
        record.framework_dir_path = "/opt/cef/framework".to_string();
        record.log_items = LogItems::FLAG_PROCESS_ID | LogItems::FLAG_TICK_COUNT;
        record.chrome_policy_id = "com.example.app".to_string();
        record.chrome_app_icon_id = 101;
        record.disable_signal_handlers = cfg!(all(unix, not(target_os = "android")));

        let native = NativeSettingsRecord::from_record(&record);
        assert_eq!(native.persist_session_cookies, 1);
        assert_eq!(native.log_severity, 5);
        assert!(native.locale == *"pt-BR");

        assert_eq!(native.to_record(), record);
    }

    #[test]
    fn test_field_order_follows_cef_settings() {
        use std::mem::offset_of;

        let order = [
            offset_of!(NativeSettingsRecord, size),
            offset_of!(NativeSettingsRecord, no_sandbox),
            offset_of!(NativeSettingsRecord, browser_subprocess_path),
            offset_of!(NativeSettingsRecord, framework_dir_path),
            offset_of!(NativeSettingsRecord, main_bundle_path),
            offset_of!(NativeSettingsRecord, multi_threaded_message_loop),
            offset_of!(NativeSettingsRecord, external_message_pump),
            offset_of!(NativeSettingsRecord, windowless_rendering_enabled),
            offset_of!(NativeSettingsRecord, command_line_args_disabled),
            offset_of!(NativeSettingsRecord, cache_path),
            offset_of!(NativeSettingsRecord, root_cache_path),
            offset_of!(NativeSettingsRecord, persist_session_cookies),
            offset_of!(NativeSettingsRecord, user_agent),
            offset_of!(NativeSettingsRecord, user_agent_product),
            offset_of!(NativeSettingsRecord, locale),
            offset_of!(NativeSettingsRecord, log_file),
            offset_of!(NativeSettingsRecord, log_severity),
            offset_of!(NativeSettingsRecord, log_items),
            offset_of!(NativeSettingsRecord, javascript_flags),
            offset_of!(NativeSettingsRecord, resources_dir_path),
            offset_of!(NativeSettingsRecord, locales_dir_path),
            offset_of!(NativeSettingsRecord, remote_debugging_port),
            offset_of!(NativeSettingsRecord, uncaught_exception_stack_size),
            offset_of!(NativeSettingsRecord, background_color),
            offset_of!(NativeSettingsRecord, accept_language_list),
            offset_of!(NativeSettingsRecord, cookieable_schemes_list),
            offset_of!(NativeSettingsRecord, cookieable_schemes_exclude_defaults),
            offset_of!(NativeSettingsRecord, chrome_policy_id),
            offset_of!(NativeSettingsRecord, chrome_app_icon_id),
        ];
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[cfg(all(target_os = "linux", target_pointer_width = "64"))]
    #[test]
    fn test_linux_64_offsets() {
        use std::mem::offset_of;

        assert_eq!(offset_of!(NativeSettingsRecord, browser_subprocess_path), 16);
        assert_eq!(offset_of!(NativeSettingsRecord, multi_threaded_message_loop), 88);
        assert_eq!(offset_of!(NativeSettingsRecord, cache_path), 104);
        assert_eq!(offset_of!(NativeSettingsRecord, log_severity), 256);
        assert_eq!(offset_of!(NativeSettingsRecord, log_items), 260);
        assert_eq!(offset_of!(NativeSettingsRecord, background_color), 344);
        assert_eq!(offset_of!(NativeSettingsRecord, chrome_policy_id), 408);
        assert_eq!(offset_of!(NativeSettingsRecord, disable_signal_handlers), 436);
        assert_eq!(mem::size_of::<NativeSettingsRecord>(), 440);
    }

    #[test]
    fn test_unknown_severity_decodes_as_default() {
        let mut native = NativeSettingsRecord::default();
        native.log_severity = 7;
        assert_eq!(native.to_record().log_severity, LogSeverity::Default);
    }

    #[test]
    fn test_nonzero_flag_reads_true() {
        assert!(from_c_bool(2));
        assert!(!from_c_bool(0));
        assert_eq!(to_c_bool(true), 1);
    }

    #[test]
    fn test_handle_release_once() {
        let mut handle = NativeSettingsHandle::allocate(NativeSettingsRecord::default());
        assert!(!handle.is_released());
        assert!(!handle.as_ptr().is_null());

        assert!(handle.release());
        assert!(handle.is_released());
        assert!(handle.as_ptr().is_null());
        assert!(handle.get().is_none());

        assert!(!handle.release());
    }
}
