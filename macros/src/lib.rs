use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{parse_macro_input, Attribute, ImplItem, ItemImpl, LitInt, LitStr, Meta, Type};

/// Turns an impl block of axum handlers into a `Controller` and an OpenAPI
/// struct named `<Struct>Api`.
///
/// Usage:
/// ```rust,ignore
/// struct JobsController;
///
/// #[controller(namespace = "jobs", state = AppState)]
/// impl JobsController {
///     #[get("/jobs/")]
///     #[utoipa_response(status = 200, body = JobList)]
///     async fn index(State(state): State<AppState>) -> Json<JobList> { ... }
/// }
/// ```
///
/// Every annotated function becomes a route named `"<namespace>.<function>"`.
/// `namespace` defaults to the struct name without its `Controller` suffix,
/// lowercased; `state` defaults to `()`.
#[proc_macro_attribute]
pub fn controller(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as ControllerArgs);
    let impl_block = parse_macro_input!(input as ItemImpl);
    let self_ty = &impl_block.self_ty;
    let struct_name = match &**self_ty {
        syn::Type::Path(type_path) => match type_path.path.segments.last() {
            Some(segment) => &segment.ident,
            None => {
                return syn::Error::new(impl_block.span(), "Expected a struct type")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new(impl_block.span(), "Expected a struct type")
                .to_compile_error()
                .into();
        }
    };

    let namespace = args.namespace.map(|lit| lit.value()).unwrap_or_else(|| {
        struct_name
            .to_string()
            .trim_end_matches("Controller")
            .to_lowercase()
    });
    let state = match args.state {
        Some(ty) => quote! { #ty },
        None => quote! { () },
    };

    let mut route_registrations = Vec::new();
    let mut openapi_path_functions = Vec::new();
    let mut openapi_path_names = Vec::new();
    let mut schema_types = Vec::new();

    for item in &impl_block.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let Some((method_name, path)) = extract_route_attr(&method.attrs) else {
            continue;
        };

        let fn_name = &method.sig.ident;
        let endpoint = format!("{}.{}", namespace, fn_name);
        let axum_method = format_ident!("{}", method_name);
        let http_method = format_ident!("{}", method_name.to_uppercase());

        route_registrations.push(quote! {
            orchest_core::blueprint::Route::new(
                #endpoint,
                axum::http::Method::#http_method,
                #path,
                axum::routing::#axum_method(#self_ty::#fn_name),
            )
        });

        // utoipa::path cannot sit on an associated function, so a
        // documentation-only twin is generated at module level.
        let wrapper_name = format_ident!("__utoipa_path_{}", fn_name);
        let fn_vis = &method.vis;
        let fn_async = method.sig.asyncness;
        let fn_inputs = &method.sig.inputs;
        let fn_output = &method.sig.output;
        let fn_generics = &method.sig.generics;
        let fn_where_clause = &method.sig.generics.where_clause;
        let path_lit = LitStr::new(&path, method.span());
        let struct_name_str = struct_name.to_string();
        let fn_name_str = fn_name.to_string();

        let response_attrs = extract_utoipa_response_attrs(&method.attrs);
        let path_attr_tokens = if response_attrs.is_empty() {
            quote! {
                #axum_method,
                path = #path_lit,
                tag = #namespace,
            }
        } else {
            quote! {
                #axum_method,
                path = #path_lit,
                tag = #namespace,
                responses(
                    #(#response_attrs),*
                ),
            }
        };

        openapi_path_functions.push(quote! {
            #[doc = concat!("OpenAPI description of ", #struct_name_str, "::", #fn_name_str, ".")]
            #[allow(dead_code, unused_variables)]
            #[utoipa::path(
                #path_attr_tokens
            )]
            #fn_vis #fn_async fn #wrapper_name #fn_generics(#fn_inputs) #fn_output #fn_where_clause {
                unimplemented!("documentation-only wrapper")
            }
        });

        openapi_path_names.push(wrapper_name);
        schema_types.extend(extract_response_schema_types(&method.attrs));
    }

    let mut unique_schemas = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for schema_type in schema_types {
        let type_str = quote!(#schema_type).to_string();
        if seen.insert(type_str) {
            unique_schemas.push(schema_type);
        }
    }

    let api_struct_name = format_ident!("{}Api", struct_name);
    let openapi_attr = if unique_schemas.is_empty() {
        quote! {
            #[derive(utoipa::OpenApi)]
            #[openapi(
                paths(
                    #(#openapi_path_names),*
                )
            )]
        }
    } else {
        quote! {
            #[derive(utoipa::OpenApi)]
            #[openapi(
                paths(
                    #(#openapi_path_names),*
                ),
                components(schemas(
                    #(#unique_schemas),*
                ))
            )]
        }
    };

    let expanded = quote! {
        #impl_block

        impl orchest_core::controller::Controller<#state> for #self_ty {
            const NAMESPACE: &'static str = #namespace;

            fn routes() -> ::std::vec::Vec<orchest_core::blueprint::Route<#state>> {
                ::std::vec![
                    #(#route_registrations),*
                ]
            }
        }

        #(#openapi_path_functions)*

        #openapi_attr
        pub struct #api_struct_name;
    };

    TokenStream::from(expanded)
}

/// Arguments of `#[controller(...)]`.
struct ControllerArgs {
    namespace: Option<LitStr>,
    state: Option<Type>,
}

impl syn::parse::Parse for ControllerArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut namespace = None;
        let mut state = None;

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            let _eq: syn::Token![=] = input.parse()?;

            if key == "namespace" {
                namespace = Some(input.parse()?);
            } else if key == "state" {
                state = Some(input.parse()?);
            } else {
                return Err(syn::Error::new(key.span(), format!("Unknown argument: {}", key)));
            }

            if !input.is_empty() {
                let _comma: syn::Token![,] = input.parse()?;
            }
        }

        Ok(ControllerArgs { namespace, state })
    }
}

/// Looks for `#[get("/path")]` or `#[orchest_macros::get("/path")]` and
/// friends. The controller attribute runs first, so these are still present.
fn extract_route_attr(attrs: &[Attribute]) -> Option<(String, String)> {
    for attr in attrs {
        let Some(last_segment) = attr.path().segments.last() else {
            continue;
        };

        let method = last_segment.ident.to_string().to_lowercase();
        if matches!(method.as_str(), "get" | "post" | "put" | "delete" | "patch") {
            if let Meta::List(meta) = &attr.meta {
                if let Ok(path_lit) = syn::parse2::<LitStr>(meta.tokens.clone()) {
                    return Some((method, path_lit.value()));
                }
            }
        }
    }
    None
}

/// Collects `#[utoipa_response(...)]` attributes as entries for the
/// `responses(...)` list of `utoipa::path`:
/// - `#[utoipa_response(Type)]`: status 200 with `Type` as body
/// - `#[utoipa_response(response = Type)]`: `Type` implements `IntoResponses`
/// - `#[utoipa_response(status = 404, body = Type, description = "...")]`
fn extract_utoipa_response_attrs(attrs: &[Attribute]) -> Vec<proc_macro2::TokenStream> {
    let mut responses = Vec::new();

    for attr in attrs {
        let Some(last_segment) = attr.path().segments.last() else {
            continue;
        };
        if last_segment.ident != "utoipa_response" {
            continue;
        }
        let Meta::List(meta) = &attr.meta else {
            continue;
        };
        let tokens = meta.tokens.clone();

        if let Ok(parsed) = syn::parse2::<UtoipaResponseArgs>(tokens.clone()) {
            if let Some(response_type) = parsed.response {
                responses.push(quote! { #response_type });
                continue;
            }

            let status = parsed.status.unwrap_or(200);
            let description = parsed.description.as_deref().unwrap_or("Success");
            match parsed.body {
                Some(body_type) => responses.push(quote! {
                    (status = #status, description = #description, body = #body_type)
                }),
                None => responses.push(quote! {
                    (status = #status, description = #description)
                }),
            }
            continue;
        }

        if let Ok(response_type) = syn::parse2::<Type>(tokens) {
            responses.push(quote! {
                (status = 200, description = "Success", body = #response_type)
            });
        }
    }

    responses
}

/// Types named by `#[utoipa_response]` that belong in `components(schemas(...))`.
fn extract_response_schema_types(attrs: &[Attribute]) -> Vec<Type> {
    let mut schema_types = Vec::new();

    for attr in attrs {
        let Some(last_segment) = attr.path().segments.last() else {
            continue;
        };
        if last_segment.ident != "utoipa_response" {
            continue;
        }
        let Meta::List(meta) = &attr.meta else {
            continue;
        };
        let tokens = meta.tokens.clone();

        if let Ok(parsed) = syn::parse2::<UtoipaResponseArgs>(tokens.clone()) {
            if let Some(body_type) = parsed.body {
                schema_types.push(body_type);
            }
            // IntoResponses types document themselves; only their
            // generic arguments need registering.
            if let Some(response_type) = parsed.response {
                extract_types_from_generic(&response_type, &mut schema_types);
            }
            continue;
        }

        if let Ok(response_type) = syn::parse2::<Type>(tokens) {
            schema_types.push(response_type);
        }
    }

    schema_types
}

fn extract_types_from_generic(ty: &Type, schema_types: &mut Vec<Type>) {
    let Type::Path(type_path) = ty else {
        return;
    };
    let Some(path_segment) = type_path.path.segments.last() else {
        return;
    };
    if let syn::PathArguments::AngleBracketed(args) = &path_segment.arguments {
        for arg in &args.args {
            if let syn::GenericArgument::Type(ty) = arg {
                extract_types_from_generic(ty, schema_types);
                schema_types.push(ty.clone());
            }
        }
    }
}

#[derive(Debug)]
struct UtoipaResponseArgs {
    status: Option<u16>,
    body: Option<Type>,
    response: Option<Type>,
    description: Option<String>,
}

impl syn::parse::Parse for UtoipaResponseArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut status = None;
        let mut body = None;
        let mut response = None;
        let mut description = None;

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            let key_str = key.to_string();

            if key_str == "status" {
                let _eq: syn::Token![=] = input.parse()?;
                let lit: LitInt = input.parse()?;
                status = Some(lit.base10_parse::<u16>()?);
            } else if key_str == "body" {
                let _eq: syn::Token![=] = input.parse()?;
                body = Some(input.parse()?);
            } else if key_str == "response" {
                let _eq: syn::Token![=] = input.parse()?;
                response = Some(input.parse()?);
            } else if key_str == "description" {
                let _eq: syn::Token![=] = input.parse()?;
                let lit: LitStr = input.parse()?;
                description = Some(lit.value());
            } else {
                return Err(syn::Error::new(key.span(), format!("Unknown argument: {}", key_str)));
            }

            if !input.is_empty() {
                let _comma: syn::Token![,] = input.parse()?;
            }
        }

        if body.is_some() && response.is_some() {
            return Err(input.error("Cannot specify both 'body' and 'response'. Use 'body' for simple types or 'response' for IntoResponses types."));
        }

        Ok(UtoipaResponseArgs {
            status,
            body,
            response,
            description,
        })
    }
}

/// Marks a controller function as a GET route.
#[proc_macro_attribute]
pub fn get(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Marks a controller function as a POST route.
#[proc_macro_attribute]
pub fn post(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Marks a controller function as a PUT route.
#[proc_macro_attribute]
pub fn put(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Marks a controller function as a DELETE route.
#[proc_macro_attribute]
pub fn delete(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Marks a controller function as a PATCH route.
#[proc_macro_attribute]
pub fn patch(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}

/// Documents a response of a controller function. Repeat it for several
/// status codes. Read by `#[controller]`; the attribute itself is a no-op.
#[proc_macro_attribute]
pub fn utoipa_response(_args: TokenStream, input: TokenStream) -> TokenStream {
    input
}
