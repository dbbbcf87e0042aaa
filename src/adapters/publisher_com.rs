//! Late-bound COM automation of `Publisher.Application`.
//!
//! All calls go through `IDispatch`. When the server exposes its type
//! library the PDF export constants are read from it; otherwise the
//! fallback values in [`ExportConstants::FALLBACK`] are used.

use crate::domain::model::{BindingKind, ExportConstants};
use crate::domain::ports::{PublisherApp, PublisherDocument, PublisherLauncher};
use crate::utils::error::{ConvertError, Result};
use std::path::Path;
use windows::core::{w, Interface, IUnknown, BSTR, GUID, HSTRING, PCWSTR, VARIANT};
use windows::Win32::System::Com::{
    CLSIDFromProgID, CoCreateInstance, CoInitializeEx, CoUninitialize, IDispatch, ITypeLib,
    CLSCTX_LOCAL_SERVER, COINIT_APARTMENTTHREADED, DISPATCH_FLAGS, DISPATCH_METHOD,
    DISPATCH_PROPERTYGET, DISPATCH_PROPERTYPUT, DISPPARAMS, EXCEPINFO, TKIND_ENUM,
};
use windows::Win32::System::Ole::DISPID_PROPERTYPUT;

const LOCALE_USER_DEFAULT: u32 = 0x0400;

/// Keeps COM initialised (single-threaded apartment) on this thread.
struct ComApartment;

impl ComApartment {
    fn enter() -> Result<Self> {
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
            .ok()
            .map_err(|e| com_error("initialize COM", e))?;
        Ok(Self)
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

fn com_error(operation: &str, e: windows::core::Error) -> ConvertError {
    ConvertError::automation(operation, format!("{} (HRESULT {:#010x})", e, e.code().0))
}

struct Dispatch(IDispatch);

impl Dispatch {
    fn dispid(&self, operation: &str, name: &str) -> Result<i32> {
        let wide = HSTRING::from(name);
        let names = [PCWSTR(wide.as_ptr())];
        let mut id = 0i32;
        unsafe {
            self.0
                .GetIDsOfNames(&GUID::zeroed(), names.as_ptr(), 1, LOCALE_USER_DEFAULT, &mut id)
        }
        .map_err(|e| com_error(operation, e))?;
        Ok(id)
    }

    fn invoke(
        &self,
        operation: &str,
        name: &str,
        flags: DISPATCH_FLAGS,
        mut args: Vec<VARIANT>,
    ) -> Result<VARIANT> {
        let id = self.dispid(operation, name)?;

        // IDispatch expects arguments right to left
        args.reverse();
        let mut put_id = DISPID_PROPERTYPUT;
        let mut params = DISPPARAMS {
            rgvarg: if args.is_empty() {
                std::ptr::null_mut()
            } else {
                args.as_mut_ptr()
            },
            rgdispidNamedArgs: std::ptr::null_mut(),
            cArgs: args.len() as u32,
            cNamedArgs: 0,
        };
        if flags == DISPATCH_PROPERTYPUT {
            params.rgdispidNamedArgs = &mut put_id;
            params.cNamedArgs = 1;
        }

        let mut result = VARIANT::default();
        let mut excep = EXCEPINFO::default();
        let mut arg_err = 0u32;
        let outcome = unsafe {
            self.0.Invoke(
                id,
                &GUID::zeroed(),
                LOCALE_USER_DEFAULT,
                flags,
                &params,
                Some(&mut result),
                Some(&mut excep),
                Some(&mut arg_err),
            )
        };

        match outcome {
            Ok(()) => Ok(result),
            Err(e) => {
                let description = excep.bstrDescription.to_string();
                if description.is_empty() {
                    Err(com_error(operation, e))
                } else {
                    Err(ConvertError::automation(
                        operation,
                        format!(
                            "{} [source: {}, HRESULT {:#010x}, argument {}]",
                            description,
                            excep.bstrSource,
                            e.code().0,
                            arg_err
                        ),
                    ))
                }
            }
        }
    }

    fn get(&self, operation: &str, name: &str) -> Result<VARIANT> {
        self.invoke(operation, name, DISPATCH_METHOD | DISPATCH_PROPERTYGET, Vec::new())
    }

    fn call(&self, operation: &str, name: &str, args: Vec<VARIANT>) -> Result<VARIANT> {
        self.invoke(operation, name, DISPATCH_METHOD, args)
    }

    fn put(&self, operation: &str, name: &str, value: VARIANT) -> Result<()> {
        self.invoke(operation, name, DISPATCH_PROPERTYPUT, vec![value])?;
        Ok(())
    }
}

fn as_dispatch(value: &VARIANT) -> Option<IDispatch> {
    if value.is_empty() {
        return None;
    }
    IUnknown::try_from(value).ok()?.cast::<IDispatch>().ok()
}

fn path_variant(path: &Path) -> VARIANT {
    VARIANT::from(BSTR::from(path.to_string_lossy().as_ref()))
}

/// Looks `name` up among the enum members of the application's type
/// library.
fn find_enum_constant(lib: &ITypeLib, name: &str) -> Option<i32> {
    let count = unsafe { lib.GetTypeInfoCount() };
    for index in 0..count {
        let Ok(info) = (unsafe { lib.GetTypeInfo(index) }) else {
            continue;
        };
        let Ok(attr) = (unsafe { info.GetTypeAttr() }) else {
            continue;
        };
        let (kind, vars) = unsafe { ((*attr).typekind, (*attr).cVars) };
        unsafe { info.ReleaseTypeAttr(attr) };
        if kind != TKIND_ENUM {
            continue;
        }

        for var in 0..u32::from(vars) {
            let Ok(desc) = (unsafe { info.GetVarDesc(var) }) else {
                continue;
            };
            let memid = unsafe { (*desc).memid };
            let value = unsafe {
                let raw = (*desc).Anonymous.lpvarValue;
                if raw.is_null() {
                    None
                } else {
                    i32::try_from(&*raw).ok()
                }
            };
            unsafe { info.ReleaseVarDesc(desc) };

            let mut member = BSTR::new();
            let mut help_context = 0u32;
            let named = unsafe {
                info.GetDocumentation(memid, Some(&mut member), None, &mut help_context, None)
            };
            if named.is_ok() && member.to_string() == name {
                return value;
            }
        }
    }
    None
}

fn resolve_constants(app: &IDispatch) -> Option<ExportConstants> {
    let has_type_info = unsafe { app.GetTypeInfoCount() }.map(|n| n > 0).unwrap_or(false);
    if !has_type_info {
        return None;
    }
    let info = unsafe { app.GetTypeInfo(0, LOCALE_USER_DEFAULT) }.ok()?;
    let mut lib: Option<ITypeLib> = None;
    let mut lib_index = 0u32;
    unsafe { info.GetContainingTypeLib(&mut lib, &mut lib_index) }.ok()?;
    let lib = lib?;

    Some(ExportConstants {
        format: find_enum_constant(&lib, ExportConstants::FORMAT_NAME)?,
        intent: find_enum_constant(&lib, ExportConstants::INTENT_NAME)?,
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ComPublisherLauncher;

impl PublisherLauncher for ComPublisherLauncher {
    type App = ComPublisher;

    fn launch(&self) -> Result<ComPublisher> {
        let apartment = ComApartment::enter()?;
        let clsid = unsafe { CLSIDFromProgID(w!("Publisher.Application")) }
            .map_err(|e| com_error("launch", e))?;
        let app: IDispatch = unsafe { CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER) }
            .map_err(|e| com_error("launch", e))?;

        let (binding, constants) = match resolve_constants(&app) {
            Some(constants) => (BindingKind::TypeLibrary, constants),
            None => {
                tracing::warn!(
                    "Type library constants unavailable, using fallback export values {:?}",
                    ExportConstants::FALLBACK
                );
                (BindingKind::Dynamic, ExportConstants::FALLBACK)
            }
        };

        Ok(ComPublisher {
            app: Dispatch(app),
            binding,
            constants,
            _apartment: apartment,
        })
    }
}

pub struct ComPublisher {
    app: Dispatch,
    binding: BindingKind,
    constants: ExportConstants,
    // dropped last: interface pointers must be released before CoUninitialize
    _apartment: ComApartment,
}

impl PublisherApp for ComPublisher {
    type Document = ComDocument;

    fn binding(&self) -> BindingKind {
        self.binding
    }

    fn export_constants(&self) -> ExportConstants {
        self.constants
    }

    fn set_visible(&self, visible: bool) -> Result<()> {
        self.app.put("hide window", "Visible", VARIANT::from(visible))
    }

    fn open(&self, path: &Path) -> Result<Option<ComDocument>> {
        let result = self.app.call("open document", "Open", vec![path_variant(path)])?;
        Ok(as_dispatch(&result).map(|doc| ComDocument(Dispatch(doc))))
    }

    fn quit(self) -> Result<()> {
        self.app.call("quit", "Quit", Vec::new())?;
        Ok(())
    }
}

pub struct ComDocument(Dispatch);

impl PublisherDocument for ComDocument {
    fn full_name(&self) -> Result<String> {
        let value = self.0.get("read document name", "FullName")?;
        BSTR::try_from(&value)
            .map(|name| name.to_string())
            .map_err(|e| com_error("read document name", e))
    }

    fn export_as_fixed_format(&self, constants: ExportConstants, destination: &Path) -> Result<()> {
        self.0.call(
            "export",
            "ExportAsFixedFormat",
            vec![
                VARIANT::from(constants.format),
                path_variant(destination),
                VARIANT::from(constants.intent),
            ],
        )?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.0.call("close document", "Close", Vec::new())?;
        Ok(())
    }
}
