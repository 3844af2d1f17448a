// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Runtime request interceptor script
//!
//! Static rewriting cannot see URLs that client-side code constructs
//! after load, so every HTML document gets one inline script that
//! patches the browser's network entry points: `XMLHttpRequest.open`,
//! `window.fetch`, and dynamically created `<script>` elements all pass
//! their URL through a single `rewriteUrlForProxy` function before the
//! real call runs. Without this, AJAX-heavy pages escape the proxy.

/// JS template; `__TARGET_ORIGIN__` and `__PROXY_BASE__` are substituted
/// per document.
const SHIM_TEMPLATE: &str = r#"
(function() {
    var TARGET_ORIGIN = '__TARGET_ORIGIN__';
    var PROXY_BASE = '__PROXY_BASE__';
    var ROUTE = PROXY_BASE + '/api/proxy?url=';

    function rewriteUrlForProxy(url) {
        if (typeof url !== 'string' || url === '') { return url; }
        if (url.indexOf('data:') === 0 || url.indexOf('blob:') === 0) { return url; }
        if (url.indexOf('/api/proxy?url=') !== -1) { return url; }
        if (url.indexOf('//') === 0) { url = 'https:' + url; }
        if (url.indexOf('http://') !== 0 && url.indexOf('https://') !== 0) {
            var path = url.charAt(0) === '/' ? url : '/' + url;
            return ROUTE + encodeURIComponent(TARGET_ORIGIN + path);
        }
        try {
            var parsed = new URL(url);
            if (parsed.origin === TARGET_ORIGIN) {
                return ROUTE + encodeURIComponent(url);
            }
            if (parsed.origin === window.location.origin) {
                // Artifact of incomplete server-side rewriting: the code
                // built an absolute URL from the embedding page's origin.
                return ROUTE + encodeURIComponent(TARGET_ORIGIN + parsed.pathname + parsed.search);
            }
        } catch (e) {
            return url;
        }
        return url;
    }

    // Patch XHR
    var origOpen = XMLHttpRequest.prototype.open;
    XMLHttpRequest.prototype.open = function(method, url) {
        arguments[1] = rewriteUrlForProxy(url);
        return origOpen.apply(this, arguments);
    };

    // Patch fetch
    if (window.fetch) {
        var origFetch = window.fetch;
        window.fetch = function(input, init) {
            if (typeof input === 'string') {
                input = rewriteUrlForProxy(input);
            } else if (input && typeof input.url === 'string') {
                input = rewriteUrlForProxy(input.url);
            }
            return origFetch.call(this, input, init);
        };
    }

    // Patch dynamic script creation: libraries that inject <script>
    // tags at runtime assign .src or call setAttribute
    var origCreateElement = document.createElement;
    document.createElement = function(tagName) {
        var el = origCreateElement.apply(document, arguments);
        if (String(tagName).toLowerCase() === 'script') {
            var origSetAttribute = el.setAttribute;
            el.setAttribute = function(name, value) {
                if (String(name).toLowerCase() === 'src') {
                    value = rewriteUrlForProxy(value);
                }
                return origSetAttribute.call(this, name, value);
            };
            try {
                Object.defineProperty(el, 'src', {
                    get: function() { return el.getAttribute('src'); },
                    set: function(value) {
                        origSetAttribute.call(el, 'src', rewriteUrlForProxy(value));
                    }
                });
            } catch (e) {}
        }
        return el;
    };

    window.__porticoRewriteUrl = rewriteUrlForProxy;
})();
"#;

/// Render the interceptor script for one document
pub fn shim_script(target_origin: &str, proxy_base: &str) -> String {
    SHIM_TEMPLATE
        .replace("__TARGET_ORIGIN__", target_origin)
        .replace("__PROXY_BASE__", proxy_base)
}
