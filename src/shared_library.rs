// Copyright 2026 Axon Robotics Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: Dynamic shared-library loading with resolved image paths
//! OWNERS: @runtime
//! INVARIANTS:
//! - A handle is zero-initialised, loaded, then unloaded; `lib_pointer` is
//!   null outside the loaded window
//! - `library_path` holds the path of the image the linker actually mapped,
//!   not necessarily the path the caller passed
//! - Any failure after the OS open closes the library before returning; a
//!   failed close leaks it and warns on stderr

use core::ffi::c_void;
use core::ptr;

use crate::allocator::Allocator;
use crate::error::{UtilError, UtilResult};
use crate::set_error_msg;
use crate::types::alloc_string::AllocString;

/// Handle to a loaded shared library.
pub struct SharedLibrary {
    lib_pointer: *mut c_void,
    library_path: Option<AllocString>,
    allocator: Allocator,
}

unsafe impl Send for SharedLibrary {}

impl Default for SharedLibrary {
    fn default() -> Self {
        Self::zero_initialized()
    }
}

impl SharedLibrary {
    /// An unloaded handle ready for [`SharedLibrary::load`].
    pub fn zero_initialized() -> Self {
        Self {
            lib_pointer: ptr::null_mut(),
            library_path: None,
            allocator: Allocator::zero_initialized(),
        }
    }

    /// True while the library is loaded.
    pub fn is_loaded(&self) -> bool {
        !self.lib_pointer.is_null()
    }

    /// The resolved filesystem path of the loaded image.
    pub fn library_path(&self) -> Option<&str> {
        self.library_path.as_ref().map(|p| p.as_str())
    }

    /// Loads the library at `library_path` with lazy symbol resolution and
    /// records the absolute path of the image the dynamic linker mapped.
    /// The handle must be zero-initialised.
    pub fn load(&mut self, library_path: &str, allocator: Allocator) -> UtilResult<()> {
        crate::fault_injection_maybe_return!(UtilError::Error);
        if !allocator.is_valid() {
            set_error_msg!("invalid allocator");
            return Err(UtilError::InvalidArgument);
        }
        if !self.lib_pointer.is_null() {
            set_error_msg!("lib argument is not zero-initialized");
            return Err(UtilError::InvalidArgument);
        }
        self.allocator = allocator;
        self.load_os(library_path)
    }

    #[cfg(unix)]
    fn load_os(&mut self, library_path: &str) -> UtilResult<()> {
        let c_path = match std::ffi::CString::new(library_path) {
            Ok(p) => p,
            Err(_) => {
                set_error_msg!("library path contains an interior nul byte");
                return Err(UtilError::InvalidArgument);
            }
        };
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_LAZY) };
        if handle.is_null() {
            set_error_msg!("dlopen error: {}", last_dlerror());
            return Err(UtilError::Error);
        }
        self.lib_pointer = handle;

        let resolved = match self.resolve_image_path(library_path) {
            Ok(path) => path,
            Err(e) => {
                self.close_after_failed_load();
                return Err(e);
            }
        };
        match AllocString::duplicate(&resolved, &self.allocator) {
            Ok(owned) => {
                self.library_path = Some(owned);
                Ok(())
            }
            Err(e) => {
                self.close_after_failed_load();
                Err(e)
            }
        }
    }

    // Image-path lookup on glibc-like systems: ask the linker for the
    // handle's link map and take its l_name.
    //
    // `libc` does not expose `link_map`, so mirror the public ABI from
    // glibc's <link.h> (only the leading fields we need are declared;
    // layout must match so `l_name`'s offset is correct).
    #[cfg(all(unix, target_env = "gnu"))]
    fn resolve_image_path(&mut self, _library_path: &str) -> UtilResult<String> {
        #[repr(C)]
        struct LinkMap {
            l_addr: usize,
            l_name: *mut libc::c_char,
            l_ld: *mut c_void,
            l_next: *mut c_void,
            l_prev: *mut c_void,
        }

        let mut map: *mut LinkMap = ptr::null_mut();
        let rc = unsafe {
            libc::dlinfo(
                self.lib_pointer,
                libc::RTLD_DI_LINKMAP,
                &mut map as *mut *mut LinkMap as *mut c_void,
            )
        };
        if rc != 0 || map.is_null() {
            set_error_msg!("dlinfo error: {}", last_dlerror());
            return Err(UtilError::Error);
        }
        let name = unsafe { (*map).l_name };
        if name.is_null() {
            set_error_msg!("link map has no image name");
            return Err(UtilError::Error);
        }
        Ok(unsafe { std::ffi::CStr::from_ptr(name) }.to_string_lossy().into_owned())
    }

    // On Darwin the handle cannot be queried directly; walk the loaded
    // images newest-first and find the one that resolves to our handle.
    #[cfg(target_os = "macos")]
    fn resolve_image_path(&mut self, _library_path: &str) -> UtilResult<String> {
        let image_count = unsafe { libc::_dyld_image_count() };
        for i in 0..image_count {
            let candidate = unsafe { libc::_dyld_get_image_name(image_count - i - 1) };
            if candidate.is_null() {
                set_error_msg!("dyld image index out of range");
                return Err(UtilError::Error);
            }
            let probe = unsafe { libc::dlopen(candidate, libc::RTLD_LAZY | libc::RTLD_NOLOAD) };
            let matched = probe == self.lib_pointer;
            if !probe.is_null() && unsafe { libc::dlclose(probe) } != 0 {
                set_error_msg!("dlclose error: {}", last_dlerror());
                return Err(UtilError::Error);
            }
            if matched {
                let name = unsafe { std::ffi::CStr::from_ptr(candidate) };
                return Ok(name.to_string_lossy().into_owned());
            }
        }
        set_error_msg!("dyld image name could not be found");
        Err(UtilError::Error)
    }

    // No per-handle lookup on this platform; keep the caller's path.
    #[cfg(all(unix, not(target_env = "gnu"), not(target_os = "macos")))]
    fn resolve_image_path(&mut self, library_path: &str) -> UtilResult<String> {
        Ok(library_path.to_string())
    }

    #[cfg(windows)]
    fn load_os(&mut self, library_path: &str) -> UtilResult<()> {
        let c_path = match std::ffi::CString::new(library_path) {
            Ok(p) => p,
            Err(_) => {
                set_error_msg!("library path contains an interior nul byte");
                return Err(UtilError::InvalidArgument);
            }
        };
        let module = unsafe { win32::LoadLibraryA(c_path.as_ptr()) };
        if module.is_null() {
            set_error_msg!("LoadLibrary error: {}", unsafe { win32::GetLastError() });
            return Err(UtilError::Error);
        }
        self.lib_pointer = module as *mut c_void;

        // Query the module file name with a buffer that doubles until the
        // whole path fits.
        let mut capacity: u32 = 260;
        loop {
            let mut buffer = vec![0u8; capacity as usize];
            let written =
                unsafe { win32::GetModuleFileNameA(module, buffer.as_mut_ptr(), capacity) };
            if written == 0 {
                set_error_msg!("GetModuleFileName error: {}", unsafe { win32::GetLastError() });
                self.close_after_failed_load();
                return Err(UtilError::Error);
            }
            if written as usize >= capacity as usize {
                capacity *= 2;
                continue;
            }
            let path = String::from_utf8_lossy(&buffer[..written as usize]).into_owned();
            match AllocString::duplicate(&path, &self.allocator) {
                Ok(owned) => {
                    self.library_path = Some(owned);
                    return Ok(());
                }
                Err(e) => {
                    self.close_after_failed_load();
                    return Err(e);
                }
            }
        }
    }

    // Best-effort close on a failed load; a close failure leaks the library.
    fn close_after_failed_load(&mut self) {
        if !close_library(self.lib_pointer) {
            eprintln!(
                "[axon_util|shared_library.rs:{}] failed to close library after failed load, \
                 library leaked",
                line!()
            );
        }
        self.lib_pointer = ptr::null_mut();
    }

    /// The address of `symbol_name`, or null when the inputs are invalid or
    /// the symbol is missing (a diagnostic naming the resolved library path
    /// is set in that case).
    pub fn get_symbol(&self, symbol_name: &str) -> *mut c_void {
        if !self.is_loaded() {
            set_error_msg!("invalid inputs arguments");
            return ptr::null_mut();
        }
        let Ok(c_name) = std::ffi::CString::new(symbol_name) else {
            set_error_msg!("symbol name contains an interior nul byte");
            return ptr::null_mut();
        };
        let symbol = lookup_symbol(self.lib_pointer, &c_name);
        if symbol.is_null() {
            set_error_msg!(
                "symbol '{}' does not exist in the library '{}'",
                symbol_name,
                self.library_path().unwrap_or("")
            );
            return ptr::null_mut();
        }
        symbol
    }

    /// True when `symbol_name` resolves in the library; never sets an error.
    pub fn has_symbol(&self, symbol_name: &str) -> bool {
        if !self.is_loaded() {
            return false;
        }
        let Ok(c_name) = std::ffi::CString::new(symbol_name) else {
            return false;
        };
        has_symbol_os(self.lib_pointer, &c_name)
    }

    /// Closes the library and clears the handle. The fields are reset even
    /// when the OS close call fails; the failure is still reported.
    pub fn unload(&mut self) -> UtilResult<()> {
        if self.lib_pointer.is_null() || self.library_path.is_none() {
            set_error_msg!("library is not loaded");
            return Err(UtilError::InvalidArgument);
        }
        if !self.allocator.is_valid() {
            set_error_msg!("shared library has no valid allocator");
            return Err(UtilError::InvalidArgument);
        }

        let mut ret = Ok(());
        if !close_library(self.lib_pointer) {
            set_error_msg!("error closing the shared library: {}", close_error());
            ret = Err(UtilError::Error);
        }

        if let Some(path) = self.library_path.take() {
            unsafe { path.free(&self.allocator) };
        }
        self.lib_pointer = ptr::null_mut();
        self.allocator = Allocator::zero_initialized();
        ret
    }
}

impl Drop for SharedLibrary {
    fn drop(&mut self) {
        if self.is_loaded() {
            let _ = self.unload();
        }
    }
}

impl core::fmt::Debug for SharedLibrary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedLibrary")
            .field("loaded", &self.is_loaded())
            .field("library_path", &self.library_path())
            .finish()
    }
}

#[cfg(unix)]
fn last_dlerror() -> String {
    let err = unsafe { libc::dlerror() };
    if err.is_null() {
        String::new()
    } else {
        unsafe { std::ffi::CStr::from_ptr(err) }.to_string_lossy().into_owned()
    }
}

#[cfg(unix)]
fn close_library(handle: *mut c_void) -> bool {
    unsafe { libc::dlclose(handle) == 0 }
}

#[cfg(unix)]
fn close_error() -> String {
    last_dlerror()
}

#[cfg(unix)]
fn lookup_symbol(handle: *mut c_void, name: &std::ffi::CStr) -> *mut c_void {
    unsafe {
        libc::dlerror();
        let symbol = libc::dlsym(handle, name.as_ptr());
        if !libc::dlerror().is_null() {
            return ptr::null_mut();
        }
        symbol
    }
}

// Clearing the linker error state before dlsym distinguishes "resolved to
// null" from "not found".
#[cfg(unix)]
fn has_symbol_os(handle: *mut c_void, name: &std::ffi::CStr) -> bool {
    unsafe {
        libc::dlerror();
        let symbol = libc::dlsym(handle, name.as_ptr());
        libc::dlerror().is_null() && !symbol.is_null()
    }
}

#[cfg(windows)]
mod win32 {
    #[allow(non_snake_case)]
    extern "system" {
        pub fn LoadLibraryA(lpLibFileName: *const i8) -> *mut core::ffi::c_void;
        pub fn FreeLibrary(hLibModule: *mut core::ffi::c_void) -> i32;
        pub fn GetProcAddress(
            hModule: *mut core::ffi::c_void,
            lpProcName: *const i8,
        ) -> *mut core::ffi::c_void;
        pub fn GetModuleFileNameA(
            hModule: *mut core::ffi::c_void,
            lpFilename: *mut u8,
            nSize: u32,
        ) -> u32;
        pub fn GetLastError() -> u32;
    }
}

#[cfg(windows)]
fn close_library(handle: *mut c_void) -> bool {
    unsafe { win32::FreeLibrary(handle) != 0 }
}

#[cfg(windows)]
fn close_error() -> String {
    format!("{}", unsafe { win32::GetLastError() })
}

#[cfg(windows)]
fn lookup_symbol(handle: *mut c_void, name: &std::ffi::CStr) -> *mut c_void {
    unsafe { win32::GetProcAddress(handle, name.as_ptr()) }
}

#[cfg(windows)]
fn has_symbol_os(handle: *mut c_void, name: &std::ffi::CStr) -> bool {
    !lookup_symbol(handle, name).is_null()
}

/// Renders the platform-specific file name for a library base name:
/// `lib<name>.so` on Linux and QNX, `lib<name>.dylib` on macOS and
/// `<name>.dll` on Windows, with a `d` suffix on the base name for debug
/// builds of the library.
pub fn platform_library_name(library_name: &str, debug: bool) -> String {
    let d = if debug { "d" } else { "" };
    if cfg!(target_os = "macos") {
        format!("lib{library_name}{d}.dylib")
    } else if cfg!(windows) {
        format!("{library_name}{d}.dll")
    } else {
        format!("lib{library_name}{d}.so")
    }
}
